// src/pedidos/pedidos_router.rs

use std::collections::HashMap;

use actix_web::{get, post, put, web, HttpResponse};
use bigdecimal::BigDecimal;
use sqlx::{query_as, Pool, Postgres};

// Importa as structs do módulo de pedidos
use super::pedidos_structs::{
    AtualizaPagamento, AtualizaPedido, AtualizaStatus, EstatisticasPedidos,
    EstatisticasPedidosPayload, FiltroPedidos, ItemPedidoResponse, LinhaItemPedido, NovoPedido,
    Pedido, PedidoPayload, PedidoResponse, PedidosPayload, STATUS_VALIDOS, TIPOS_DE_PEDIDO,
};
// Importa o cardápio (os preços dos itens sempre vêm do banco, nunca do cliente)
use crate::cardapio::cardapio_router::COLUNAS_ITEM;
use crate::cardapio::cardapio_structs::ItemCardapio;
// Importa a vinculação de cliente por telefone
use crate::clientes::clientes_router::{atualizar_estatisticas_do_cliente, buscar_ou_criar_cliente};
use crate::clientes::telefone::{forma_de_gravacao, remover_mascara};
// Importa o envelope e o tipo de erro do módulo shared
use crate::shared::erros::ErroApi;
use crate::shared::shared_structs::RespostaApi;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Lista de colunas usada em todas as consultas de pedidos.
pub const COLUNAS_PEDIDO: &str = "id, user_id, customer_name, customer_phone, customer_email, \
    order_type, status, total_amount, delivery_address, notes, is_comanda, mesa, \
    status_comanda, payment_method, payment_status, created_at, updated_at";

/// JOIN das linhas de pedido com o item do cardápio correspondente.
/// LEFT JOIN porque o item pode ter sido removido do cardápio depois do pedido.
const SQL_ITENS: &str = "SELECT oi.id, oi.order_id, oi.menu_item_id, oi.quantity, \
    oi.unit_price, oi.subtotal, oi.notes, \
    m.name AS mi_name, m.price AS mi_price, m.category AS mi_category, m.image_url AS mi_image_url \
    FROM order_items oi LEFT JOIN menu_items m ON m.id = oi.menu_item_id";

/// Carrega as linhas de um conjunto de pedidos e monta as respostas completas,
/// preservando a ordem dos pedidos recebida.
pub async fn montar_pedidos(
    pool: &Pool<Postgres>,
    pedidos: Vec<Pedido>,
) -> Result<Vec<PedidoResponse>, sqlx::Error> {
    if pedidos.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = pedidos.iter().map(|p| p.id).collect();
    let sql = format!("{} WHERE oi.order_id = ANY($1) ORDER BY oi.order_id, oi.id", SQL_ITENS);
    let linhas = query_as::<_, LinhaItemPedido>(&sql)
        .bind(&ids)
        .fetch_all(pool)
        .await?;

    let mut por_pedido: HashMap<i32, Vec<ItemPedidoResponse>> = HashMap::new();
    for linha in linhas {
        por_pedido
            .entry(linha.order_id)
            .or_default()
            .push(linha.into());
    }

    Ok(pedidos
        .into_iter()
        .map(|pedido| {
            let items = por_pedido.remove(&pedido.id).unwrap_or_default();
            PedidoResponse { pedido, items }
        })
        .collect())
}

/// Monta a resposta completa de um único pedido.
pub async fn montar_pedido(
    pool: &Pool<Postgres>,
    pedido: Pedido,
) -> Result<PedidoResponse, sqlx::Error> {
    let mut montados = montar_pedidos(pool, vec![pedido]).await?;
    Ok(montados.remove(0))
}

/// Cria um pedido completo: valida os dados, precifica cada linha a partir
/// do cardápio, vincula o cliente pelo telefone canônico e grava pedido e
/// linhas dentro de uma única transação.
///
/// Toda a validação acontece antes de qualquer acesso ao banco: sacola
/// vazia, canal desconhecido e mesa inválida são recusados na entrada.
/// Também é usada pelo POST /sacola/finalizar.
pub async fn inserir_pedido(
    pool: &Pool<Postgres>,
    novo: NovoPedido,
) -> Result<PedidoResponse, ErroApi> {
    // 1. Validações locais (sem rede e sem banco)
    let itens = match novo.items {
        Some(itens) if !itens.is_empty() => itens,
        _ => return Err(ErroApi::CarrinhoVazio),
    };

    let nome_cliente = novo
        .customer_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            ErroApi::Validacao("Nome do cliente, itens e tipo de pedido são obrigatórios".to_string())
        })?
        .to_string();

    let tipo_pedido = novo
        .order_type
        .as_deref()
        .filter(|t| TIPOS_DE_PEDIDO.contains(t))
        .ok_or_else(|| {
            ErroApi::Validacao(format!(
                "Tipo de pedido inválido. Valores válidos: {}",
                TIPOS_DE_PEDIDO.join(", ")
            ))
        })?
        .to_string();

    let eh_comanda = novo.is_comanda.unwrap_or(false) || tipo_pedido == "comanda";
    let mesa = if eh_comanda {
        let mesa = novo
            .mesa
            .ok_or_else(|| ErroApi::MesaInvalida("não informada".to_string()))?;
        if mesa <= 0 {
            return Err(ErroApi::MesaInvalida(mesa.to_string()));
        }
        Some(mesa)
    } else {
        None
    };

    for item in itens.iter() {
        if item.quantity < 1 {
            return Err(ErroApi::Validacao(format!(
                "Quantidade inválida para o item {}",
                item.menu_item_id
            )));
        }
    }

    // 2. Precificação e gravação dentro de uma transação
    let mut transaction = pool.begin().await?;

    let mut total = BigDecimal::from(0);
    let mut linhas: Vec<(i32, i32, BigDecimal, BigDecimal, Option<String>)> = Vec::new();

    for item in itens.iter() {
        let sql = format!("SELECT {} FROM menu_items WHERE id = $1", COLUNAS_ITEM);
        let do_cardapio = query_as::<_, ItemCardapio>(&sql)
            .bind(item.menu_item_id)
            .fetch_optional(&mut *transaction)
            .await?;

        let do_cardapio = match do_cardapio {
            Some(i) if i.is_active => i,
            _ => {
                return Err(ErroApi::Validacao(format!(
                    "Item do cardápio {} não encontrado ou inativo",
                    item.menu_item_id
                )));
            }
        };

        // Disponibilidade do item no canal de venda do pedido
        let (disponivel, rotulo) = match tipo_pedido.as_str() {
            "delivery" => (do_cardapio.available_for_delivery, "delivery"),
            "comanda" => (do_cardapio.available_for_comanda, "comanda"),
            _ => (do_cardapio.available_for_local, "consumo local"),
        };
        if !disponivel {
            return Err(ErroApi::Validacao(format!(
                "Item \"{}\" não disponível para {}",
                do_cardapio.name, rotulo
            )));
        }

        let subtotal = &do_cardapio.price * BigDecimal::from(item.quantity);
        total += &subtotal;
        linhas.push((
            item.menu_item_id,
            item.quantity,
            do_cardapio.price,
            subtotal,
            item.notes.clone(),
        ));
    }

    // 3. Vinculação do cliente pelo telefone canônico (apenas dígitos).
    // Pedidos de comanda usam "mesa N" como telefone e ficam sem vínculo.
    let telefone_canonico = novo.customer_phone.as_deref().map(remover_mascara);
    let mut user_id: Option<i32> = None;
    if let Some(canonico) = &telefone_canonico {
        if canonico.len() >= 10 {
            let id = buscar_ou_criar_cliente(
                &mut transaction,
                &nome_cliente,
                canonico,
                novo.customer_email.as_deref(),
                novo.delivery_address.as_deref(),
            )
            .await?;
            atualizar_estatisticas_do_cliente(&mut transaction, id, &total).await?;
            user_id = Some(id);
        }
    }

    // Telefones reais são gravados na forma canônica; "mesa N" fica como veio
    let telefone_gravado = novo.customer_phone.as_deref().map(forma_de_gravacao);

    let status_comanda = if eh_comanda {
        Some(novo.status_comanda.unwrap_or_else(|| "aberta".to_string()))
    } else {
        None
    };

    let sql_pedido = format!(
        "INSERT INTO orders (user_id, customer_name, customer_phone, customer_email, \
         order_type, total_amount, delivery_address, notes, is_comanda, mesa, status_comanda) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
        COLUNAS_PEDIDO
    );
    let pedido = query_as::<_, Pedido>(&sql_pedido)
        .bind(user_id)
        .bind(&nome_cliente)
        .bind(&telefone_gravado)
        .bind(&novo.customer_email)
        .bind(&tipo_pedido)
        .bind(&total)
        .bind(&novo.delivery_address)
        .bind(&novo.notes)
        .bind(eh_comanda)
        .bind(mesa)
        .bind(&status_comanda)
        .fetch_one(&mut *transaction)
        .await?;

    for (menu_item_id, quantity, unit_price, subtotal, notes) in linhas {
        sqlx::query(
            "INSERT INTO order_items (order_id, menu_item_id, quantity, unit_price, subtotal, notes) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(pedido.id)
        .bind(menu_item_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(subtotal)
        .bind(notes)
        .execute(&mut *transaction)
        .await?;
    }

    transaction.commit().await?;

    Ok(montar_pedido(pool, pedido).await?)
}

/// Rota para listar pedidos, com filtros opcionais de status e canal.
#[get("/orders")]
pub async fn buscar_pedidos(
    data: web::Data<AppState>,
    filtro: web::Query<FiltroPedidos>,
) -> Result<HttpResponse, ErroApi> {
    let mut sql = format!("SELECT {} FROM orders WHERE TRUE", COLUNAS_PEDIDO);
    let mut proximo_parametro = 1;
    if filtro.status.is_some() {
        sql.push_str(&format!(" AND status = ${}", proximo_parametro));
        proximo_parametro += 1;
    }
    if filtro.tipo.is_some() {
        sql.push_str(&format!(" AND order_type = ${}", proximo_parametro));
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut consulta = query_as::<_, Pedido>(&sql);
    if let Some(status) = &filtro.status {
        consulta = consulta.bind(status);
    }
    if let Some(tipo) = &filtro.tipo {
        consulta = consulta.bind(tipo);
    }

    let pedidos = consulta.fetch_all(&data.db_pool).await?;
    let orders = montar_pedidos(&data.db_pool, pedidos).await?;
    Ok(HttpResponse::Ok().json(RespostaApi::payload(PedidosPayload { orders })))
}

/// Rota para buscar os detalhes de um pedido específico.
#[get("/orders/{id}")]
pub async fn buscar_pedido_por_id(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();
    let sql = format!("SELECT {} FROM orders WHERE id = $1", COLUNAS_PEDIDO);
    let pedido = query_as::<_, Pedido>(&sql)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ErroApi::NaoEncontrado(format!("Pedido {} não encontrado", id)))?;

    let order = montar_pedido(&data.db_pool, pedido).await?;
    Ok(HttpResponse::Ok().json(RespostaApi::payload(PedidoPayload { order })))
}

/// Rota para criar um novo pedido (delivery, retirada local ou adição a comanda).
#[post("/orders")]
pub async fn criar_pedido(
    data: web::Data<AppState>,
    novo: web::Json<NovoPedido>,
) -> Result<HttpResponse, ErroApi> {
    let order = inserir_pedido(&data.db_pool, novo.into_inner()).await?;
    Ok(HttpResponse::Created().json(RespostaApi::sucesso(
        "Pedido criado com sucesso",
        PedidoPayload { order },
    )))
}

/// Rota para atualização parcial dos dados do cliente de um pedido.
#[put("/orders/{id}")]
pub async fn atualizar_pedido(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
    mudancas: web::Json<AtualizaPedido>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();

    let sql_busca = format!("SELECT {} FROM orders WHERE id = $1", COLUNAS_PEDIDO);
    let atual = query_as::<_, Pedido>(&sql_busca)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ErroApi::NaoEncontrado(format!("Pedido {} não encontrado", id)))?;

    let mudancas = mudancas.into_inner();
    let sql_atualiza = format!(
        "UPDATE orders SET customer_name = $1, customer_phone = $2, customer_email = $3, \
         delivery_address = $4, notes = $5, updated_at = now() WHERE id = $6 RETURNING {}",
        COLUNAS_PEDIDO
    );
    let pedido = query_as::<_, Pedido>(&sql_atualiza)
        .bind(mudancas.customer_name.unwrap_or(atual.customer_name))
        .bind(mudancas.customer_phone.as_deref().map(forma_de_gravacao).or(atual.customer_phone))
        .bind(mudancas.customer_email.or(atual.customer_email))
        .bind(mudancas.delivery_address.or(atual.delivery_address))
        .bind(mudancas.notes.or(atual.notes))
        .bind(id)
        .fetch_one(&data.db_pool)
        .await?;

    let order = montar_pedido(&data.db_pool, pedido).await?;
    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Pedido atualizado com sucesso",
        PedidoPayload { order },
    )))
}

/// Rota para atualizar o status de um pedido.
/// O status só anda dentro da lista conhecida; a escrita é uma sobrescrita
/// monotônica (repetir a chamada com o mesmo status é inofensivo).
#[put("/orders/{id}/status")]
pub async fn atualizar_status(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
    corpo: web::Json<AtualizaStatus>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();

    if !STATUS_VALIDOS.contains(&corpo.status.as_str()) {
        return Err(ErroApi::Validacao(format!(
            "Status inválido. Valores válidos: {}",
            STATUS_VALIDOS.join(", ")
        )));
    }

    let sql = format!(
        "UPDATE orders SET status = $1, updated_at = now() WHERE id = $2 RETURNING {}",
        COLUNAS_PEDIDO
    );
    let pedido = query_as::<_, Pedido>(&sql)
        .bind(&corpo.status)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ErroApi::NaoEncontrado(format!("Pedido {} não encontrado", id)))?;

    let order = montar_pedido(&data.db_pool, pedido).await?;
    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Status atualizado com sucesso",
        PedidoPayload { order },
    )))
}

/// Rota para registrar o pagamento de um pedido.
#[put("/orders/{id}/payment")]
pub async fn registrar_pagamento(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
    corpo: web::Json<AtualizaPagamento>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();

    if corpo.payment_method.trim().is_empty() {
        return Err(ErroApi::Validacao(
            "Forma de pagamento é obrigatória".to_string(),
        ));
    }

    let sql = format!(
        "UPDATE orders SET payment_method = $1, payment_status = 'pago', updated_at = now() \
         WHERE id = $2 RETURNING {}",
        COLUNAS_PEDIDO
    );
    let pedido = query_as::<_, Pedido>(&sql)
        .bind(&corpo.payment_method)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ErroApi::NaoEncontrado(format!("Pedido {} não encontrado", id)))?;

    let order = montar_pedido(&data.db_pool, pedido).await?;
    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Pagamento registrado com sucesso",
        PedidoPayload { order },
    )))
}

/// Rota para as estatísticas do painel administrativo.
#[get("/orders/stats")]
pub async fn estatisticas_de_pedidos(
    data: web::Data<AppState>,
) -> Result<HttpResponse, ErroApi> {
    let total_orders = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
        .fetch_one(&data.db_pool)
        .await?;
    let pending_orders =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = 'pendente'")
            .fetch_one(&data.db_pool)
            .await?;
    let preparing_orders =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = 'preparando'")
            .fetch_one(&data.db_pool)
            .await?;
    let ready_orders =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = 'pronto'")
            .fetch_one(&data.db_pool)
            .await?;

    Ok(HttpResponse::Ok().json(RespostaApi::payload(EstatisticasPedidosPayload {
        stats: EstatisticasPedidos {
            total_orders,
            pending_orders,
            preparing_orders,
            ready_orders,
        },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedidos::pedidos_structs::NovoItemPedido;
    use sqlx::postgres::PgPoolOptions;

    // Pool preguiçoso apontando para um endereço sem servidor: qualquer
    // consulta falharia com erro de conexão, então receber um erro de
    // validação prova que a recusa acontece antes de tocar o banco.
    fn pool_sem_banco() -> Pool<Postgres> {
        PgPoolOptions::new()
            .connect_lazy("postgres://casanorte@127.0.0.1:1/casanorte")
            .unwrap()
    }

    fn pedido_base() -> NovoPedido {
        NovoPedido {
            customer_name: Some("Maria".to_string()),
            customer_phone: Some("(11) 91234-5678".to_string()),
            customer_email: None,
            order_type: Some("local".to_string()),
            items: Some(Vec::new()),
            delivery_address: None,
            notes: None,
            is_comanda: None,
            mesa: None,
            status_comanda: None,
        }
    }

    #[actix_web::test]
    async fn sacola_vazia_e_recusada_antes_de_qualquer_acesso_ao_banco() {
        let pool = pool_sem_banco();

        let sem_itens = NovoPedido {
            items: None,
            ..pedido_base()
        };
        assert!(matches!(
            inserir_pedido(&pool, sem_itens).await,
            Err(ErroApi::CarrinhoVazio)
        ));

        let lista_vazia = pedido_base();
        assert!(matches!(
            inserir_pedido(&pool, lista_vazia).await,
            Err(ErroApi::CarrinhoVazio)
        ));
    }

    #[actix_web::test]
    async fn mesa_invalida_e_recusada_antes_de_qualquer_acesso_ao_banco() {
        let pool = pool_sem_banco();

        let novo = NovoPedido {
            order_type: Some("comanda".to_string()),
            items: Some(vec![NovoItemPedido {
                menu_item_id: 1,
                quantity: 1,
                notes: None,
            }]),
            mesa: Some(0),
            ..pedido_base()
        };
        assert!(matches!(
            inserir_pedido(&pool, novo).await,
            Err(ErroApi::MesaInvalida(_))
        ));
    }
}
