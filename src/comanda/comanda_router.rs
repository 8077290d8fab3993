// src/comanda/comanda_router.rs

use actix_web::{get, put, web, HttpResponse};
use futures::future::join_all;
use sqlx::query_as;

// Importa a agregação e a validação de mesa
use super::comanda_structs::{
    agregar_itens, total_da_comanda, validar_mesa, ComandaPayload, FalhaFechamento,
    FechamentoPayload,
};
// Importa a montagem de pedidos completos
use crate::pedidos::pedidos_router::{montar_pedidos, COLUNAS_PEDIDO};
use crate::pedidos::pedidos_structs::Pedido;
// Importa o envelope e o tipo de erro do módulo shared
use crate::shared::erros::ErroApi;
use crate::shared::shared_structs::RespostaApi;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota para buscar a conta aberta de uma mesa.
///
/// Valida a mesa antes de qualquer consulta e retorna tanto a lista de
/// pedidos abertos quanto a visão agregada (quantidades somadas por item)
/// com o total da conta. Adições à comanda entram pelo POST /orders como
/// um novo pedido da mesma mesa; o histórico nunca é alterado.
#[get("/comanda/{mesa}")]
pub async fn buscar_comanda(
    data: web::Data<AppState>,
    caminho: web::Path<String>,
) -> Result<HttpResponse, ErroApi> {
    let mesa = validar_mesa(&caminho.into_inner())?;

    let sql = format!(
        "SELECT {} FROM orders WHERE is_comanda = TRUE AND mesa = $1 \
         AND status_comanda = 'aberta' ORDER BY created_at",
        COLUNAS_PEDIDO
    );
    let pedidos = query_as::<_, Pedido>(&sql)
        .bind(mesa)
        .fetch_all(&data.db_pool)
        .await?;

    let orders = montar_pedidos(&data.db_pool, pedidos).await?;
    let items = agregar_itens(orders.iter().flat_map(|pedido| pedido.items.iter()));
    let total = total_da_comanda(&items).with_scale(2);

    Ok(HttpResponse::Ok().json(RespostaApi::payload(ComandaPayload {
        mesa,
        orders,
        items,
        total,
    })))
}

/// Rota para fechar a comanda de uma mesa.
///
/// Marca cada pedido aberto da mesa como entregue/fechado. As atualizações
/// são independentes e não transacionais: se alguma falhar, a resposta sai
/// com `success: false` e lista quais pedidos fecharam e quais não, para o
/// operador repetir o fechamento (a escrita é uma sobrescrita de status,
/// então repetir é inofensivo).
#[put("/comanda/{mesa}/fechar")]
pub async fn fechar_comanda(
    data: web::Data<AppState>,
    caminho: web::Path<String>,
) -> Result<HttpResponse, ErroApi> {
    let mesa = validar_mesa(&caminho.into_inner())?;

    let ids = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM orders WHERE is_comanda = TRUE AND mesa = $1 \
         AND status_comanda = 'aberta' ORDER BY id",
    )
    .bind(mesa)
    .fetch_all(&data.db_pool)
    .await?;

    if ids.is_empty() {
        return Err(ErroApi::NaoEncontrado(format!(
            "Nenhuma comanda aberta para a mesa {}",
            mesa
        )));
    }

    // Uma atualização por pedido, disparadas em paralelo
    let atualizacoes = ids.iter().map(|id| {
        sqlx::query(
            "UPDATE orders SET status = 'entregue', status_comanda = 'fechada', \
             updated_at = now() WHERE id = $1",
        )
        .bind(*id)
        .execute(&data.db_pool)
    });
    let resultados = join_all(atualizacoes).await;

    let mut closed = Vec::new();
    let mut failed = Vec::new();
    for (id, resultado) in ids.iter().zip(resultados) {
        match resultado {
            Ok(_) => closed.push(*id),
            Err(e) => {
                tracing::error!("falha ao fechar pedido {} da mesa {}: {:?}", id, mesa, e);
                failed.push(FalhaFechamento {
                    order_id: *id,
                    message: "Erro ao atualizar o pedido".to_string(),
                });
            }
        }
    }

    let payload = FechamentoPayload { mesa, closed, failed };
    let resposta = if payload.failed.is_empty() {
        RespostaApi::sucesso("Comanda fechada com sucesso", payload)
    } else {
        // Fechamento parcial: o envelope sinaliza a falha e o payload
        // diz exatamente quais pedidos continuam abertos
        RespostaApi {
            success: false,
            message: Some(format!(
                "Fechamento parcial: {} pedido(s) não foram fechados",
                payload.failed.len()
            )),
            body: Some(payload),
        }
    };

    Ok(HttpResponse::Ok().json(resposta))
}
