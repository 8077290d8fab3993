// src/cardapio/cardapio_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use bigdecimal::BigDecimal;
use sqlx::query_as;

// Importa as structs definidas no módulo `cardapio_structs`
use super::cardapio_structs::{
    AtualizaItemCardapio, CategoriasPayload, FiltroCardapio, ItemCardapio, ItemPayload,
    ItensPayload, NovoItemCardapio,
};
// Importa o envelope e o tipo de erro do módulo shared
use crate::shared::erros::ErroApi;
use crate::shared::shared_structs::RespostaApi;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Lista de colunas usada em todas as consultas de itens do cardápio.
pub const COLUNAS_ITEM: &str = "id, name, description, price, category, \
    available_for_delivery, available_for_local, available_for_comanda, \
    is_active, image_url, created_at, updated_at";

/// Rota para buscar o cardápio visível ao cliente.
///
/// Retorna apenas itens ativos, filtrados pelo canal de venda
/// (`type=delivery|local|comanda`, padrão 'local') e, opcionalmente,
/// por categoria. A ordenação é por (categoria, nome).
#[get("/menu")]
pub async fn buscar_cardapio(
    data: web::Data<AppState>,
    filtro: web::Query<FiltroCardapio>,
) -> Result<HttpResponse, ErroApi> {
    // Coluna de disponibilidade correspondente ao canal pedido
    let coluna_canal = match filtro.tipo.as_deref() {
        Some("delivery") => "available_for_delivery",
        Some("comanda") => "available_for_comanda",
        _ => "available_for_local", // 'local' é o padrão
    };

    let mut sql = format!(
        "SELECT {} FROM menu_items WHERE is_active = TRUE AND {} = TRUE",
        COLUNAS_ITEM, coluna_canal
    );
    if filtro.category.is_some() {
        sql.push_str(" AND category = $1");
    }
    sql.push_str(" ORDER BY category, name");

    let mut consulta = query_as::<_, ItemCardapio>(&sql);
    if let Some(categoria) = &filtro.category {
        consulta = consulta.bind(categoria);
    }

    let items = consulta.fetch_all(&data.db_pool).await?;
    Ok(HttpResponse::Ok().json(RespostaApi::payload(ItensPayload { items })))
}

/// Rota para listar as categorias distintas dos itens ativos.
#[get("/menu/categories")]
pub async fn buscar_categorias(data: web::Data<AppState>) -> Result<HttpResponse, ErroApi> {
    let categories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT category FROM menu_items WHERE is_active = TRUE ORDER BY category",
    )
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(RespostaApi::payload(CategoriasPayload { categories })))
}

/// Rota de administração: retorna todos os itens, inclusive inativos.
#[get("/menu/admin")]
pub async fn buscar_cardapio_admin(data: web::Data<AppState>) -> Result<HttpResponse, ErroApi> {
    let sql = format!(
        "SELECT {} FROM menu_items ORDER BY category, name",
        COLUNAS_ITEM
    );
    let items = query_as::<_, ItemCardapio>(&sql)
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(RespostaApi::payload(ItensPayload { items })))
}

/// Rota para cadastrar um novo item do cardápio.
#[post("/menu")]
pub async fn cadastrar_item(
    data: web::Data<AppState>,
    item: web::Json<NovoItemCardapio>,
) -> Result<HttpResponse, ErroApi> {
    if item.name.trim().is_empty() || item.category.trim().is_empty() {
        return Err(ErroApi::Validacao(
            "Nome, preço e categoria são obrigatórios".to_string(),
        ));
    }
    if item.price < BigDecimal::from(0) {
        return Err(ErroApi::Validacao(
            "O preço não pode ser negativo".to_string(),
        ));
    }

    let sql = format!(
        "INSERT INTO menu_items \
         (name, description, price, category, available_for_delivery, \
          available_for_local, available_for_comanda, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
        COLUNAS_ITEM
    );
    let criado = query_as::<_, ItemCardapio>(&sql)
        .bind(&item.name)
        .bind(item.description.as_deref().unwrap_or(""))
        .bind(&item.price)
        .bind(&item.category)
        .bind(item.available_for_delivery.unwrap_or(true))
        .bind(item.available_for_local.unwrap_or(true))
        .bind(item.available_for_comanda.unwrap_or(true))
        .bind(&item.image_url)
        .fetch_one(&data.db_pool)
        .await?;

    Ok(HttpResponse::Created().json(RespostaApi::sucesso(
        "Item criado com sucesso",
        ItemPayload { item: criado },
    )))
}

/// Rota para atualização parcial de um item do cardápio.
/// Campos ausentes no corpo da requisição mantêm o valor atual.
#[put("/menu/{id}")]
pub async fn atualizar_item(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
    mudancas: web::Json<AtualizaItemCardapio>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();

    // Busca o item atual para preencher os campos não informados
    let sql_busca = format!("SELECT {} FROM menu_items WHERE id = $1", COLUNAS_ITEM);
    let atual = query_as::<_, ItemCardapio>(&sql_busca)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ErroApi::NaoEncontrado(format!("Item {} não encontrado", id)))?;

    let mudancas = mudancas.into_inner();
    if let Some(preco) = &mudancas.price {
        if *preco < BigDecimal::from(0) {
            return Err(ErroApi::Validacao(
                "O preço não pode ser negativo".to_string(),
            ));
        }
    }

    let sql_atualiza = format!(
        "UPDATE menu_items SET name = $1, description = $2, price = $3, category = $4, \
         available_for_delivery = $5, available_for_local = $6, available_for_comanda = $7, \
         is_active = $8, image_url = $9, updated_at = now() \
         WHERE id = $10 RETURNING {}",
        COLUNAS_ITEM
    );
    let atualizado = query_as::<_, ItemCardapio>(&sql_atualiza)
        .bind(mudancas.name.unwrap_or(atual.name))
        .bind(mudancas.description.unwrap_or(atual.description))
        .bind(mudancas.price.unwrap_or(atual.price))
        .bind(mudancas.category.unwrap_or(atual.category))
        .bind(
            mudancas
                .available_for_delivery
                .unwrap_or(atual.available_for_delivery),
        )
        .bind(
            mudancas
                .available_for_local
                .unwrap_or(atual.available_for_local),
        )
        .bind(
            mudancas
                .available_for_comanda
                .unwrap_or(atual.available_for_comanda),
        )
        .bind(mudancas.is_active.unwrap_or(atual.is_active))
        .bind(mudancas.image_url.or(atual.image_url))
        .bind(id)
        .fetch_one(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Item atualizado com sucesso",
        ItemPayload { item: atualizado },
    )))
}

/// Rota para remover um item do cardápio (soft delete: `is_active = false`).
#[delete("/menu/{id}")]
pub async fn remover_item(
    data: web::Data<AppState>,
    caminho: web::Path<i32>,
) -> Result<HttpResponse, ErroApi> {
    let id = caminho.into_inner();

    let resultado = sqlx::query("UPDATE menu_items SET is_active = FALSE, updated_at = now() WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ErroApi::NaoEncontrado(format!("Item {} não encontrado", id)));
    }

    Ok(HttpResponse::Ok().json(RespostaApi::mensagem("Item removido com sucesso")))
}
