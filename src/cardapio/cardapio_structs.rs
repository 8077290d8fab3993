// src/cardapio/cardapio_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Item do cardápio como armazenado no banco de dados.
///
/// Os nomes dos campos seguem o contrato JSON dos clientes (chaves em
/// inglês). As flags `available_for_*` controlam em qual canal de venda
/// (delivery, retirada local ou comanda) o item aparece.
#[derive(Serialize, Clone, FromRow)]
pub struct ItemCardapio {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub category: String,
    pub available_for_delivery: bool,
    pub available_for_local: bool,
    pub available_for_comanda: bool,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Estrutura para receber os dados de um novo item na requisição POST.
#[derive(Deserialize)]
pub struct NovoItemCardapio {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: String,
    pub available_for_delivery: Option<bool>,
    pub available_for_local: Option<bool>,
    pub available_for_comanda: Option<bool>,
    pub image_url: Option<String>,
}

/// Estrutura para atualização parcial de um item (PUT).
/// Campos ausentes no JSON mantêm o valor atual.
#[derive(Deserialize)]
pub struct AtualizaItemCardapio {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub category: Option<String>,
    pub available_for_delivery: Option<bool>,
    pub available_for_local: Option<bool>,
    pub available_for_comanda: Option<bool>,
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
}

/// Parâmetros de filtro do GET /menu.
#[derive(Deserialize)]
pub struct FiltroCardapio {
    /// Canal de venda: 'delivery', 'local' ou 'comanda' (padrão: 'local')
    #[serde(rename = "type")]
    pub tipo: Option<String>,
    pub category: Option<String>,
}

// --- Payloads de resposta (achatados no envelope RespostaApi) ---

#[derive(Serialize)]
pub struct ItensPayload {
    pub items: Vec<ItemCardapio>,
}

#[derive(Serialize)]
pub struct ItemPayload {
    pub item: ItemCardapio,
}

#[derive(Serialize)]
pub struct CategoriasPayload {
    pub categories: Vec<String>,
}
