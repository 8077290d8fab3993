// src/carrinho/carrinho_router.rs

use std::sync::RwLock;

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::query_as;

// Importa o motor da sacola e as structs das rotas
use super::carrinho_structs::{
    AdicionaItemSacola, Carrinho, DefineQuantidadeSacola, FinalizaSacola, SacolaPayload,
};
// Importa o cardápio (a adição confere o item no banco antes de aceitar)
use crate::cardapio::cardapio_router::COLUNAS_ITEM;
use crate::cardapio::cardapio_structs::ItemCardapio;
// Importa a criação de pedidos
use crate::pedidos::pedidos_router::inserir_pedido;
use crate::pedidos::pedidos_structs::{NovoItemPedido, NovoPedido, PedidoPayload};
// Importa o envelope e o tipo de erro do módulo shared
use crate::shared::erros::ErroApi;
use crate::shared::shared_structs::RespostaApi;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Monta o payload da sacola com total arredondado para exibição.
fn payload_da_sacola(sacola: &Carrinho) -> SacolaPayload {
    SacolaPayload {
        items: sacola.itens.clone(),
        total: sacola.total().with_scale(2),
        item_count: sacola.quantidade_itens(),
    }
}

/// Rota para adicionar uma unidade de um item à sacola.
/// O item precisa existir e estar ativo no cardápio; adições repetidas
/// do mesmo item somam quantidade em vez de criar linhas duplicadas.
#[post("/sacola/adicionar")]
pub async fn adicionar_item_sacola(
    data: web::Data<AppState>,
    carrinho_data: web::Data<RwLock<Carrinho>>,
    corpo: web::Json<AdicionaItemSacola>,
) -> Result<HttpResponse, ErroApi> {
    let sql = format!("SELECT {} FROM menu_items WHERE id = $1", COLUNAS_ITEM);
    let item = query_as::<_, ItemCardapio>(&sql)
        .bind(corpo.menu_item_id)
        .fetch_optional(&data.db_pool)
        .await?;

    let item = match item {
        Some(i) if i.is_active => i,
        _ => {
            return Err(ErroApi::Validacao(format!(
                "Item do cardápio {} não encontrado ou inativo",
                corpo.menu_item_id
            )));
        }
    };

    let mut sacola = carrinho_data.write().unwrap();
    sacola.adicionar_item(&item);

    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Item adicionado à sacola",
        payload_da_sacola(&sacola),
    )))
}

/// Rota para definir a quantidade de um item da sacola.
/// Quantidade zero ou negativa remove a linha; item ausente é ignorado.
#[put("/sacola/quantidade")]
pub async fn definir_quantidade_sacola(
    carrinho_data: web::Data<RwLock<Carrinho>>,
    corpo: web::Json<DefineQuantidadeSacola>,
) -> Result<HttpResponse, ErroApi> {
    let mut sacola = carrinho_data.write().unwrap();
    sacola.definir_quantidade(corpo.menu_item_id, corpo.quantity);

    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Sacola atualizada",
        payload_da_sacola(&sacola),
    )))
}

/// Rota para remover um item da sacola.
#[delete("/sacola/item/{menu_item_id}")]
pub async fn remover_item_sacola(
    carrinho_data: web::Data<RwLock<Carrinho>>,
    caminho: web::Path<i32>,
) -> Result<HttpResponse, ErroApi> {
    let mut sacola = carrinho_data.write().unwrap();
    sacola.remover_item(caminho.into_inner());

    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Item removido da sacola",
        payload_da_sacola(&sacola),
    )))
}

/// Rota para visualizar o conteúdo atual da sacola.
#[get("/sacola")]
pub async fn ver_sacola(
    carrinho_data: web::Data<RwLock<Carrinho>>,
) -> Result<HttpResponse, ErroApi> {
    let sacola = carrinho_data.read().unwrap();
    Ok(HttpResponse::Ok().json(RespostaApi::payload(payload_da_sacola(&sacola))))
}

/// Rota para esvaziar a sacola (desistência do pedido).
#[delete("/sacola")]
pub async fn limpar_sacola(
    carrinho_data: web::Data<RwLock<Carrinho>>,
) -> Result<HttpResponse, ErroApi> {
    let mut sacola = carrinho_data.write().unwrap();
    sacola.limpar();

    Ok(HttpResponse::Ok().json(RespostaApi::mensagem("Sacola esvaziada")))
}

/// Rota para finalizar a sacola como um pedido.
///
/// Os itens são copiados sob o lock de leitura e o pedido é criado dentro
/// de uma transação; a sacola só é esvaziada depois do commit. Se a criação
/// falhar, a sacola permanece intacta para o cliente corrigir e reenviar.
#[post("/sacola/finalizar")]
pub async fn finalizar_sacola(
    data: web::Data<AppState>,
    carrinho_data: web::Data<RwLock<Carrinho>>,
    corpo: web::Json<FinalizaSacola>,
) -> Result<HttpResponse, ErroApi> {
    // Copia os itens sem segurar o lock durante o acesso ao banco
    let itens: Vec<NovoItemPedido> = {
        let sacola = carrinho_data.read().unwrap();
        if sacola.esta_vazio() {
            return Err(ErroApi::CarrinhoVazio);
        }
        sacola
            .itens
            .iter()
            .map(|linha| NovoItemPedido {
                menu_item_id: linha.menu_item_id,
                quantity: linha.quantity,
                notes: linha.notes.clone(),
            })
            .collect()
    };

    let corpo = corpo.into_inner();
    let eh_comanda = corpo.order_type.as_deref() == Some("comanda");
    let novo = NovoPedido {
        customer_name: corpo.customer_name,
        customer_phone: corpo.customer_phone,
        customer_email: corpo.customer_email,
        order_type: corpo.order_type,
        items: Some(itens),
        delivery_address: corpo.delivery_address,
        notes: corpo.notes,
        is_comanda: Some(eh_comanda),
        mesa: corpo.mesa,
        status_comanda: None,
    };

    let order = inserir_pedido(&data.db_pool, novo).await?;

    // Pedido gravado: agora sim a sacola é esvaziada
    carrinho_data.write().unwrap().limpar();

    Ok(HttpResponse::Created().json(RespostaApi::sucesso(
        "Pedido criado com sucesso",
        PedidoPayload { order },
    )))
}
