// src/clientes/clientes_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pedidos::pedidos_structs::PedidoResponse;

/// Cliente como armazenado no banco de dados. O telefone é gravado na
/// forma canônica (apenas dígitos) e é a chave de identificação usada
/// pelo checkout de convidado e pelo histórico "meus pedidos".
#[derive(Serialize, Clone, FromRow)]
pub struct Cliente {
    pub id: i32,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_address: Option<String>,
    pub total_orders: i32,
    pub total_spent: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Corpo do POST /auth/phone.
#[derive(Deserialize)]
pub struct AuthTelefone {
    pub phone: String,
    pub name: Option<String>,
}

/// Parâmetros do GET /users.
#[derive(Deserialize)]
pub struct FiltroClientes {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Corpo do PUT /users/{id} (atualização parcial).
#[derive(Deserialize)]
pub struct AtualizaCliente {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_address: Option<String>,
}

// --- Payloads de resposta ---

#[derive(Serialize)]
pub struct ClientesPayload {
    pub users: Vec<Cliente>,
}

#[derive(Serialize)]
pub struct ClientePayload {
    pub user: Cliente,
}

#[derive(Serialize)]
pub struct ClientePedidosPayload {
    pub user: Cliente,
    pub orders: Vec<PedidoResponse>,
}

/// Payload do POST /auth/phone: o cliente resolvido, seu histórico e o
/// pedido mais recente ainda em andamento (nenhum, se todos encerrados).
#[derive(Serialize)]
pub struct AuthPayload {
    pub user: Cliente,
    pub orders: Vec<PedidoResponse>,
    pub current_order: Option<PedidoResponse>,
}

#[derive(Serialize)]
pub struct EstatisticasClientes {
    pub total_users: i64,
    pub users_with_orders: i64,
    pub total_revenue: BigDecimal,
    pub top_spenders: Vec<Cliente>,
}

#[derive(Serialize)]
pub struct EstatisticasClientesPayload {
    pub stats: EstatisticasClientes,
}
