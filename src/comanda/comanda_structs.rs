// src/comanda/comanda_structs.rs

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::pedidos::pedidos_structs::{ItemPedidoResponse, PedidoResponse};
use crate::shared::erros::ErroApi;

/// Linha agregada da conta de uma mesa: o mesmo item do cardápio pode
/// aparecer em vários pedidos abertos; aqui as quantidades e subtotais
/// são somados em uma única linha, na ordem em que o item apareceu.
#[derive(Serialize, Clone)]
pub struct ItemComanda {
    pub menu_item_id: i32,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

/// Payload do GET /comanda/{mesa}.
///
/// A lista completa de pedidos abertos é exposta ao lado da visão
/// agregada: quando a mesa tem mais de um pedido aberto não existe "o"
/// pedido atual, e é o cliente da API quem decide qual deles endereçar.
#[derive(Serialize)]
pub struct ComandaPayload {
    pub mesa: i32,
    pub orders: Vec<PedidoResponse>,
    pub items: Vec<ItemComanda>,
    pub total: BigDecimal,
}

/// Resultado por pedido do fechamento de comanda.
#[derive(Serialize)]
pub struct FalhaFechamento {
    pub order_id: i32,
    pub message: String,
}

/// Payload do PUT /comanda/{mesa}/fechar. O fechamento não é atômico:
/// cada pedido aberto é atualizado individualmente, e uma falha parcial
/// é reportada pedido a pedido em vez de ficar silenciosa.
#[derive(Serialize)]
pub struct FechamentoPayload {
    pub mesa: i32,
    pub closed: Vec<i32>,
    pub failed: Vec<FalhaFechamento>,
}

/// Valida o identificador de mesa vindo do caminho da URL.
/// Aceita apenas inteiros positivos; qualquer outra coisa é recusada
/// antes de tocar o banco.
pub fn validar_mesa(texto: &str) -> Result<i32, ErroApi> {
    texto
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|mesa| *mesa > 0)
        .ok_or_else(|| ErroApi::MesaInvalida(texto.to_string()))
}

/// Agrega as linhas de um conjunto de pedidos abertos, somando quantidades
/// e subtotais por item do cardápio. Pura: não consulta nada.
pub fn agregar_itens<'a, I>(linhas: I) -> Vec<ItemComanda>
where
    I: IntoIterator<Item = &'a ItemPedidoResponse>,
{
    let mut agregados: Vec<ItemComanda> = Vec::new();
    for linha in linhas {
        if let Some(existente) = agregados
            .iter_mut()
            .find(|item| item.menu_item_id == linha.menu_item_id)
        {
            existente.quantity += linha.quantity;
            existente.subtotal += &linha.subtotal;
        } else {
            let name = linha
                .menu_item
                .as_ref()
                .map(|mi| mi.name.clone())
                .unwrap_or_else(|| format!("Item {}", linha.menu_item_id));
            agregados.push(ItemComanda {
                menu_item_id: linha.menu_item_id,
                name,
                unit_price: linha.unit_price.clone(),
                quantity: linha.quantity,
                subtotal: linha.subtotal.clone(),
            });
        }
    }
    agregados
}

/// Total da conta da mesa: soma dos subtotais agregados, em precisão plena.
pub fn total_da_comanda(itens: &[ItemComanda]) -> BigDecimal {
    let mut total = BigDecimal::from(0);
    for item in itens {
        total += &item.subtotal;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedidos::pedidos_structs::MenuItemResumo;

    fn linha(order_id: i32, menu_item_id: i32, nome: &str, preco: &str, qtd: i32) -> ItemPedidoResponse {
        let unit_price: BigDecimal = preco.parse().unwrap();
        let subtotal = &unit_price * BigDecimal::from(qtd);
        ItemPedidoResponse {
            id: menu_item_id * 100 + order_id,
            order_id,
            menu_item_id,
            menu_item: Some(MenuItemResumo {
                id: menu_item_id,
                name: nome.to_string(),
                price: unit_price.clone(),
                category: "prato principal".to_string(),
                image_url: None,
            }),
            quantity: qtd,
            unit_price,
            subtotal,
            notes: None,
        }
    }

    #[test]
    fn mesa_precisa_ser_inteiro_positivo() {
        assert!(validar_mesa("7").is_ok());
        assert_eq!(validar_mesa(" 12 ").unwrap(), 12);

        assert!(matches!(validar_mesa("0"), Err(ErroApi::MesaInvalida(_))));
        assert!(matches!(validar_mesa("-1"), Err(ErroApi::MesaInvalida(_))));
        assert!(matches!(validar_mesa("abc"), Err(ErroApi::MesaInvalida(_))));
        assert!(matches!(validar_mesa(""), Err(ErroApi::MesaInvalida(_))));
    }

    #[test]
    fn o_mesmo_item_em_dois_pedidos_vira_uma_linha_somada() {
        // Dois pedidos abertos da mesma mesa, ambos com o item 1 (qtd 2 e 3)
        let linhas = vec![
            linha(10, 1, "X-Burger", "18.90", 2),
            linha(11, 1, "X-Burger", "18.90", 3),
        ];

        let agregados = agregar_itens(&linhas);

        assert_eq!(agregados.len(), 1);
        assert_eq!(agregados[0].quantity, 5);
        assert_eq!(agregados[0].subtotal, "94.50".parse().unwrap());
    }

    #[test]
    fn itens_diferentes_mantem_linhas_separadas_na_ordem_de_chegada() {
        let linhas = vec![
            linha(10, 2, "Refrigerante", "6.50", 1),
            linha(10, 1, "X-Burger", "18.90", 1),
            linha(11, 2, "Refrigerante", "6.50", 2),
        ];

        let agregados = agregar_itens(&linhas);

        assert_eq!(agregados.len(), 2);
        assert_eq!(agregados[0].menu_item_id, 2);
        assert_eq!(agregados[0].quantity, 3);
        assert_eq!(agregados[1].menu_item_id, 1);
        assert_eq!(agregados[1].quantity, 1);
    }

    #[test]
    fn total_da_comanda_soma_os_subtotais() {
        let linhas = vec![
            linha(10, 1, "X-Burger", "18.90", 2),
            linha(11, 2, "Refrigerante", "6.50", 1),
        ];
        let agregados = agregar_itens(&linhas);

        assert_eq!(total_da_comanda(&agregados), "44.30".parse().unwrap());
    }

    #[test]
    fn comanda_sem_pedidos_agrega_vazio_com_total_zero() {
        let agregados = agregar_itens(std::iter::empty());
        assert!(agregados.is_empty());
        assert_eq!(total_da_comanda(&agregados), BigDecimal::from(0));
    }

    #[test]
    fn linha_sem_item_de_cardapio_ganha_nome_de_fallback() {
        let mut orfa = linha(10, 9, "qualquer", "5.00", 1);
        orfa.menu_item = None;

        let agregados = agregar_itens(std::iter::once(&orfa));
        assert_eq!(agregados[0].name, "Item 9");
    }
}
