// src/pedidos/pedidos_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status possíveis de um pedido, na ordem do fluxo da cozinha.
pub const STATUS_VALIDOS: [&str; 5] = ["pendente", "preparando", "pronto", "entregue", "cancelado"];

/// Canais de venda aceitos em `order_type`.
pub const TIPOS_DE_PEDIDO: [&str; 3] = ["delivery", "local", "comanda"];

/// Status que encerram um pedido (usados para decidir o "pedido atual"
/// do cliente no login por telefone).
pub const STATUS_FINAIS: [&str; 2] = ["entregue", "cancelado"];

/// Pedido como armazenado no banco de dados.
#[derive(Serialize, Clone, FromRow)]
pub struct Pedido {
    pub id: i32,
    pub user_id: Option<i32>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub order_type: String,
    pub status: String,
    pub total_amount: BigDecimal,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub is_comanda: bool,
    pub mesa: Option<i32>,
    pub status_comanda: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resumo do item do cardápio embutido em cada linha do pedido
/// (o cliente da comanda agrega as linhas por esses dados).
#[derive(Serialize, Clone)]
pub struct MenuItemResumo {
    pub id: i32,
    pub name: String,
    pub price: BigDecimal,
    pub category: String,
    pub image_url: Option<String>,
}

/// Linha crua do JOIN entre order_items e menu_items.
#[derive(FromRow)]
pub struct LinhaItemPedido {
    pub id: i32,
    pub order_id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub subtotal: BigDecimal,
    pub notes: Option<String>,
    pub mi_name: Option<String>,
    pub mi_price: Option<BigDecimal>,
    pub mi_category: Option<String>,
    pub mi_image_url: Option<String>,
}

/// Linha de pedido como exposta na API, com o item do cardápio embutido.
#[derive(Serialize, Clone)]
pub struct ItemPedidoResponse {
    pub id: i32,
    pub order_id: i32,
    pub menu_item_id: i32,
    pub menu_item: Option<MenuItemResumo>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub subtotal: BigDecimal,
    pub notes: Option<String>,
}

impl From<LinhaItemPedido> for ItemPedidoResponse {
    fn from(linha: LinhaItemPedido) -> Self {
        // O item do cardápio pode ter sido removido; o LEFT JOIN devolve NULLs
        let menu_item = match (linha.mi_name, linha.mi_price, linha.mi_category) {
            (Some(name), Some(price), Some(category)) => Some(MenuItemResumo {
                id: linha.menu_item_id,
                name,
                price,
                category,
                image_url: linha.mi_image_url,
            }),
            _ => None,
        };
        ItemPedidoResponse {
            id: linha.id,
            order_id: linha.order_id,
            menu_item_id: linha.menu_item_id,
            menu_item,
            quantity: linha.quantity,
            unit_price: linha.unit_price,
            subtotal: linha.subtotal,
            notes: linha.notes,
        }
    }
}

/// Pedido completo como exposto na API: os campos do pedido achatados
/// no nível raiz mais a lista de itens.
#[derive(Serialize, Clone)]
pub struct PedidoResponse {
    #[serde(flatten)]
    pub pedido: Pedido,
    pub items: Vec<ItemPedidoResponse>,
}

/// Corpo do POST /orders.
#[derive(Deserialize)]
pub struct NovoPedido {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub order_type: Option<String>,
    pub items: Option<Vec<NovoItemPedido>>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    // Campos de comanda
    pub is_comanda: Option<bool>,
    pub mesa: Option<i32>,
    pub status_comanda: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct NovoItemPedido {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Parâmetros de filtro do GET /orders.
#[derive(Deserialize)]
pub struct FiltroPedidos {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub tipo: Option<String>,
}

/// Corpo do PUT /orders/{id} (atualização parcial dos dados do cliente).
#[derive(Deserialize)]
pub struct AtualizaPedido {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

/// Corpo do PUT /orders/{id}/status.
#[derive(Deserialize)]
pub struct AtualizaStatus {
    pub status: String,
}

/// Corpo do PUT /orders/{id}/payment.
#[derive(Deserialize)]
pub struct AtualizaPagamento {
    pub payment_method: String,
}

// --- Payloads de resposta ---

#[derive(Serialize)]
pub struct PedidosPayload {
    pub orders: Vec<PedidoResponse>,
}

#[derive(Serialize)]
pub struct PedidoPayload {
    pub order: PedidoResponse,
}

#[derive(Serialize)]
pub struct EstatisticasPedidos {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub preparing_orders: i64,
    pub ready_orders: i64,
}

#[derive(Serialize)]
pub struct EstatisticasPedidosPayload {
    pub stats: EstatisticasPedidos,
}
