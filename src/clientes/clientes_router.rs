// src/clientes/clientes_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use bigdecimal::BigDecimal;
use sqlx::{query_as, Postgres, Transaction};

// Importa as structs do módulo de clientes
use super::clientes_structs::{
    AtualizaCliente, AuthPayload, AuthTelefone, Cliente, ClientePayload, ClientePedidosPayload,
    ClientesPayload, EstatisticasClientes, EstatisticasClientesPayload, FiltroClientes,
};
// Importa a forma canônica do telefone
use super::telefone::{forma_de_gravacao, remover_mascara};
// Importa a montagem de pedidos completos
use crate::pedidos::pedidos_router::{montar_pedidos, COLUNAS_PEDIDO};
use crate::pedidos::pedidos_structs::{Pedido, STATUS_FINAIS};
// Importa o envelope e o tipo de erro do módulo shared
use crate::shared::erros::ErroApi;
use crate::shared::shared_structs::RespostaApi;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Lista de colunas usada em todas as consultas de clientes.
pub const COLUNAS_CLIENTE: &str = "id, customer_name, customer_phone, customer_email, \
    delivery_address, total_orders, total_spent, created_at, updated_at";

/// Busca um cliente pelo telefone canônico ou cria um novo registro,
/// dentro da transação do pedido em andamento. Retorna o id do cliente.
pub async fn buscar_ou_criar_cliente(
    transaction: &mut Transaction<'_, Postgres>,
    nome: &str,
    telefone_canonico: &str,
    email: Option<&str>,
    endereco: Option<&str>,
) -> Result<i32, sqlx::Error> {
    let existente = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE customer_phone = $1")
        .bind(telefone_canonico)
        .fetch_optional(&mut **transaction)
        .await?;

    if let Some(id) = existente {
        return Ok(id);
    }

    sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (customer_name, customer_phone, customer_email, delivery_address) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(nome)
    .bind(telefone_canonico)
    .bind(email)
    .bind(endereco)
    .fetch_one(&mut **transaction)
    .await
}

/// Incrementa as estatísticas do cliente após a criação de um pedido.
pub async fn atualizar_estatisticas_do_cliente(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: i32,
    total_do_pedido: &BigDecimal,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET total_orders = total_orders + 1, total_spent = total_spent + $1, \
         updated_at = now() WHERE id = $2",
    )
    .bind(total_do_pedido)
    .bind(user_id)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

/// Rota de identificação por telefone (checkout de convidado e "meus pedidos").
///
/// Resolve o telefone canônico em um cliente — criando o registro na
/// primeira vez — e retorna o histórico de pedidos mais o pedido em
/// andamento mais recente, se houver.
#[post("/auth/phone")]
pub async fn autenticar_por_telefone(
    data: web::Data<AppState>,
    corpo: web::Json<AuthTelefone>,
) -> Result<HttpResponse, ErroApi> {
    let canonico = remover_mascara(&corpo.phone);
    if canonico.len() < 10 || canonico.len() > 11 {
        return Err(ErroApi::Validacao(
            "Telefone inválido. Informe o DDD e o número.".to_string(),
        ));
    }

    let sql_busca = format!("SELECT {} FROM users WHERE customer_phone = $1", COLUNAS_CLIENTE);
    let existente = query_as::<_, Cliente>(&sql_busca)
        .bind(&canonico)
        .fetch_optional(&data.db_pool)
        .await?;

    let user = match existente {
        Some(cliente) => cliente,
        None => {
            let nome = corpo
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or("Cliente");
            let sql_cria = format!(
                "INSERT INTO users (customer_name, customer_phone) VALUES ($1, $2) RETURNING {}",
                COLUNAS_CLIENTE
            );
            query_as::<_, Cliente>(&sql_cria)
                .bind(nome)
                .bind(&canonico)
                .fetch_one(&data.db_pool)
                .await?
        }
    };

    let sql_pedidos = format!(
        "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        COLUNAS_PEDIDO
    );
    let pedidos = query_as::<_, Pedido>(&sql_pedidos)
        .bind(user.id)
        .fetch_all(&data.db_pool)
        .await?;
    let orders = montar_pedidos(&data.db_pool, pedidos).await?;

    // O pedido "atual" é o mais recente ainda não encerrado
    let current_order = orders
        .iter()
        .find(|pedido| !STATUS_FINAIS.contains(&pedido.pedido.status.as_str()))
        .cloned();

    Ok(HttpResponse::Ok().json(RespostaApi::payload(AuthPayload {
        user,
        orders,
        current_order,
    })))
}

/// Rota para listar clientes com busca e ordenação opcionais.
#[get("/users")]
pub async fn buscar_clientes(
    data: web::Data<AppState>,
    filtro: web::Query<FiltroClientes>,
) -> Result<HttpResponse, ErroApi> {
    // Coluna de ordenação restrita à lista conhecida (nunca interpolada do usuário)
    let coluna_ordenacao = match filtro.sort_by.as_deref() {
        Some("name") => "customer_name",
        Some("total_orders") => "total_orders",
        Some("total_spent") => "total_spent",
        _ => "created_at",
    };
    let direcao = match filtro.sort_order.as_deref() {
        Some("asc") => "ASC",
        _ => "DESC",
    };

    let mut sql = format!("SELECT {} FROM users", COLUNAS_CLIENTE);
    if filtro.search.is_some() {
        sql.push_str(
            " WHERE customer_name ILIKE $1 OR customer_phone ILIKE $1 \
             OR customer_email ILIKE $1 OR delivery_address ILIKE $1",
        );
    }
    sql.push_str(&format!(" ORDER BY {} {}", coluna_ordenacao, direcao));

    let mut consulta = query_as::<_, Cliente>(&sql);
    let padrao_busca = filtro.search.as_ref().map(|s| format!("%{}%", s));
    if let Some(padrao) = &padrao_busca {
        consulta = consulta.bind(padrao);
    }

    let users = consulta.fetch_all(&data.db_pool).await?;
    Ok(HttpResponse::Ok().json(RespostaApi::payload(ClientesPayload { users })))
}

/// Rota para buscar um cliente específico.
#[get("/users/{id}")]
pub async fn buscar_cliente_por_id(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();
    let sql = format!("SELECT {} FROM users WHERE id = $1", COLUNAS_CLIENTE);
    let user = query_as::<_, Cliente>(&sql)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ErroApi::NaoEncontrado(format!("Cliente {} não encontrado", id)))?;

    Ok(HttpResponse::Ok().json(RespostaApi::payload(ClientePayload { user })))
}

/// Rota para o histórico de pedidos de um cliente.
#[get("/users/{id}/orders")]
pub async fn buscar_pedidos_do_cliente(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();
    let sql_cliente = format!("SELECT {} FROM users WHERE id = $1", COLUNAS_CLIENTE);
    let user = query_as::<_, Cliente>(&sql_cliente)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ErroApi::NaoEncontrado(format!("Cliente {} não encontrado", id)))?;

    let sql_pedidos = format!(
        "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        COLUNAS_PEDIDO
    );
    let pedidos = query_as::<_, Pedido>(&sql_pedidos)
        .bind(id)
        .fetch_all(&data.db_pool)
        .await?;
    let orders = montar_pedidos(&data.db_pool, pedidos).await?;

    Ok(HttpResponse::Ok().json(RespostaApi::payload(ClientePedidosPayload { user, orders })))
}

/// Rota para as estatísticas de clientes do painel administrativo.
#[get("/users/stats")]
pub async fn estatisticas_de_clientes(
    data: web::Data<AppState>,
) -> Result<HttpResponse, ErroApi> {
    let total_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&data.db_pool)
        .await?;
    let users_with_orders =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE total_orders > 0")
            .fetch_one(&data.db_pool)
            .await?;
    let total_revenue = sqlx::query_scalar::<_, BigDecimal>(
        "SELECT COALESCE(SUM(total_spent), 0) FROM users",
    )
    .fetch_one(&data.db_pool)
    .await?;

    let sql_top = format!(
        "SELECT {} FROM users WHERE total_spent > 0 ORDER BY total_spent DESC LIMIT 5",
        COLUNAS_CLIENTE
    );
    let top_spenders = query_as::<_, Cliente>(&sql_top)
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(RespostaApi::payload(EstatisticasClientesPayload {
        stats: EstatisticasClientes {
            total_users,
            users_with_orders,
            total_revenue,
            top_spenders,
        },
    })))
}

/// Rota para atualização parcial de um cliente.
#[put("/users/{id}")]
pub async fn atualizar_cliente(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
    mudancas: web::Json<AtualizaCliente>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();

    let sql_busca = format!("SELECT {} FROM users WHERE id = $1", COLUNAS_CLIENTE);
    let atual = query_as::<_, Cliente>(&sql_busca)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ErroApi::NaoEncontrado(format!("Cliente {} não encontrado", id)))?;

    let mudancas = mudancas.into_inner();
    let sql_atualiza = format!(
        "UPDATE users SET customer_name = $1, customer_phone = $2, customer_email = $3, \
         delivery_address = $4, updated_at = now() WHERE id = $5 RETURNING {}",
        COLUNAS_CLIENTE
    );
    let user = query_as::<_, Cliente>(&sql_atualiza)
        .bind(mudancas.customer_name.unwrap_or(atual.customer_name))
        .bind(
            mudancas
                .customer_phone
                .as_deref()
                .map(forma_de_gravacao)
                .or(atual.customer_phone),
        )
        .bind(mudancas.customer_email.or(atual.customer_email))
        .bind(mudancas.delivery_address.or(atual.delivery_address))
        .bind(id)
        .fetch_one(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Cliente atualizado com sucesso",
        ClientePayload { user },
    )))
}

/// Rota para remover um cliente. Os pedidos históricos são preservados,
/// apenas desvinculados do cadastro.
#[delete("/users/{id}")]
pub async fn remover_cliente(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();

    let mut transaction = data.db_pool.begin().await?;
    sqlx::query("UPDATE orders SET user_id = NULL WHERE user_id = $1")
        .bind(id)
        .execute(&mut *transaction)
        .await?;
    let resultado = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *transaction)
        .await?;

    if resultado.rows_affected() == 0 {
        transaction.rollback().await?;
        return Err(ErroApi::NaoEncontrado(format!("Cliente {} não encontrado", id)));
    }
    transaction.commit().await?;

    Ok(HttpResponse::Ok().json(RespostaApi::mensagem("Cliente removido com sucesso")))
}
