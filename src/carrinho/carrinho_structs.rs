// src/carrinho/carrinho_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::cardapio::cardapio_structs::ItemCardapio;

/// Uma linha da sacola: referência a um item do cardápio, a quantidade
/// escolhida e uma observação livre opcional. O preço unitário é capturado
/// no momento da adição, para que o total da sacola não mude se o cardápio
/// for editado no meio do pedido.
#[derive(Deserialize, Serialize, Clone)]
pub struct ItemCarrinho {
    pub menu_item_id: i32,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// A sacola de compras em memória de uma sessão de pedido.
///
/// Invariantes:
/// - no máximo uma linha por `menu_item_id` (adições repetidas somam quantidade);
/// - `quantity >= 1` em toda linha presente (quantidade <= 0 remove a linha);
/// - a ordem de inserção é preservada.
#[derive(Default)]
pub struct Carrinho {
    pub itens: Vec<ItemCarrinho>,
}

impl Carrinho {
    /// Adiciona uma unidade do item à sacola. Se o item já está presente,
    /// soma 1 à quantidade existente; caso contrário, cria a linha com
    /// quantidade 1 no fim da sacola.
    pub fn adicionar_item(&mut self, item: &ItemCardapio) {
        for linha in self.itens.iter_mut() {
            if linha.menu_item_id == item.id {
                linha.quantity += 1;
                return;
            }
        }
        self.itens.push(ItemCarrinho {
            menu_item_id: item.id,
            name: item.name.clone(),
            price: item.price.clone(),
            quantity: 1,
            notes: None,
        });
    }

    /// Define a quantidade de um item. Quantidade menor ou igual a zero
    /// remove a linha; um `menu_item_id` inexistente é ignorado.
    pub fn definir_quantidade(&mut self, menu_item_id: i32, quantidade: i32) {
        if quantidade <= 0 {
            self.remover_item(menu_item_id);
            return;
        }
        for linha in self.itens.iter_mut() {
            if linha.menu_item_id == menu_item_id {
                linha.quantity = quantidade;
                return;
            }
        }
    }

    /// Remove a linha do item, se presente.
    pub fn remover_item(&mut self, menu_item_id: i32) {
        self.itens.retain(|linha| linha.menu_item_id != menu_item_id);
    }

    /// Soma de `preço * quantidade` de todas as linhas, em precisão plena.
    /// O arredondamento para 2 casas acontece apenas na apresentação.
    pub fn total(&self) -> BigDecimal {
        let mut total = BigDecimal::from(0);
        for linha in self.itens.iter() {
            total += &linha.price * BigDecimal::from(linha.quantity);
        }
        total
    }

    /// Soma das quantidades (usada no contador da sacola). Zero quando vazia.
    pub fn quantidade_itens(&self) -> i32 {
        self.itens.iter().map(|linha| linha.quantity).sum()
    }

    /// Esvazia a sacola (após envio bem-sucedido do pedido ou desistência).
    pub fn limpar(&mut self) {
        self.itens.clear();
    }

    pub fn esta_vazio(&self) -> bool {
        self.itens.is_empty()
    }
}

// --- Payloads de resposta das rotas da sacola ---

#[derive(Serialize)]
pub struct SacolaPayload {
    pub items: Vec<ItemCarrinho>,
    pub total: BigDecimal,
    pub item_count: i32,
}

/// Corpo do POST /sacola/adicionar.
#[derive(Deserialize)]
pub struct AdicionaItemSacola {
    pub menu_item_id: i32,
}

/// Corpo do PUT /sacola/quantidade.
#[derive(Deserialize)]
pub struct DefineQuantidadeSacola {
    pub menu_item_id: i32,
    pub quantity: i32,
}

/// Corpo do POST /sacola/finalizar: dados do cliente para fechar o pedido
/// com os itens que estão na sacola.
#[derive(Deserialize)]
pub struct FinalizaSacola {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    /// 'delivery', 'local' ou 'comanda'
    pub order_type: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    /// Obrigatória quando order_type = 'comanda'
    pub mesa: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item_cardapio(id: i32, nome: &str, preco: &str) -> ItemCardapio {
        ItemCardapio {
            id,
            name: nome.to_string(),
            description: String::new(),
            price: preco.parse().unwrap(),
            category: "prato principal".to_string(),
            available_for_delivery: true,
            available_for_local: true,
            available_for_comanda: true,
            is_active: true,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn adicoes_repetidas_somam_quantidade() {
        let mut sacola = Carrinho::default();
        let item = item_cardapio(1, "X-Burger", "18.90");

        sacola.adicionar_item(&item);
        sacola.adicionar_item(&item);
        sacola.adicionar_item(&item);

        assert_eq!(sacola.itens.len(), 1);
        assert_eq!(sacola.itens[0].quantity, 3);
    }

    #[test]
    fn quantidade_zero_e_negativa_removem_a_linha() {
        let mut sacola = Carrinho::default();
        sacola.adicionar_item(&item_cardapio(1, "X-Burger", "18.90"));
        sacola.definir_quantidade(1, 0);
        assert!(sacola.esta_vazio());

        sacola.adicionar_item(&item_cardapio(1, "X-Burger", "18.90"));
        sacola.definir_quantidade(1, -1);
        assert!(sacola.esta_vazio());
    }

    #[test]
    fn definir_quantidade_de_item_inexistente_nao_faz_nada() {
        let mut sacola = Carrinho::default();
        sacola.adicionar_item(&item_cardapio(1, "X-Burger", "18.90"));

        sacola.definir_quantidade(99, 5);

        assert_eq!(sacola.itens.len(), 1);
        assert_eq!(sacola.itens[0].menu_item_id, 1);
        assert_eq!(sacola.itens[0].quantity, 1);
    }

    #[test]
    fn remover_item_inexistente_nao_faz_nada() {
        let mut sacola = Carrinho::default();
        sacola.adicionar_item(&item_cardapio(1, "X-Burger", "18.90"));
        sacola.remover_item(99);
        assert_eq!(sacola.itens.len(), 1);
    }

    #[test]
    fn total_nao_depende_da_ordem_de_insercao() {
        let a = item_cardapio(1, "X-Burger", "18.90");
        let b = item_cardapio(2, "Refrigerante", "6.50");

        let mut primeira = Carrinho::default();
        primeira.adicionar_item(&a);
        primeira.adicionar_item(&b);
        primeira.adicionar_item(&a);

        let mut segunda = Carrinho::default();
        segunda.adicionar_item(&b);
        segunda.adicionar_item(&a);
        segunda.adicionar_item(&a);

        assert_eq!(primeira.total(), segunda.total());
        assert_eq!(primeira.total(), "44.30".parse().unwrap());
    }

    #[test]
    fn total_e_contador_do_cenario_de_ponta_a_ponta() {
        // Sacola com [{id:1, preço:10, qtd:2}, {id:2, preço:5.5, qtd:1}]
        let mut sacola = Carrinho::default();
        let primeiro = item_cardapio(1, "Prato", "10");
        let segundo = item_cardapio(2, "Suco", "5.5");
        sacola.adicionar_item(&primeiro);
        sacola.adicionar_item(&primeiro);
        sacola.adicionar_item(&segundo);

        assert_eq!(sacola.total(), "25.5".parse().unwrap());
        assert_eq!(sacola.quantidade_itens(), 3);
    }

    #[test]
    fn limpar_esvazia_e_permite_reuso() {
        let mut sacola = Carrinho::default();
        sacola.adicionar_item(&item_cardapio(1, "X-Burger", "18.90"));
        sacola.limpar();

        assert!(sacola.esta_vazio());
        assert_eq!(sacola.quantidade_itens(), 0);
        assert_eq!(sacola.total(), BigDecimal::from(0));

        // A sacola volta ao estado inicial e aceita novas adições
        sacola.adicionar_item(&item_cardapio(2, "Suco Natural", "8.90"));
        assert_eq!(sacola.itens.len(), 1);
    }

    #[test]
    fn remocao_da_ultima_linha_volta_ao_estado_vazio() {
        let mut sacola = Carrinho::default();
        sacola.adicionar_item(&item_cardapio(1, "X-Burger", "18.90"));
        sacola.adicionar_item(&item_cardapio(2, "Suco Natural", "8.90"));

        sacola.definir_quantidade(1, 0);
        sacola.remover_item(2);

        assert!(sacola.esta_vazio());
        assert_eq!(sacola.total(), BigDecimal::from(0));
    }
}
