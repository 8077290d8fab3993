// src/shared/erros.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use super::shared_structs::RespostaApi;

/// Erros da API, convertidos no envelope `{success: false, message}`.
///
/// Erros de validação (mesa inválida, sacola vazia, campo obrigatório)
/// são detectados antes de qualquer acesso ao banco e sempre recuperáveis
/// pelo cliente; erros de banco viram uma mensagem genérica (o detalhe
/// vai para o log, nunca para a resposta).
#[derive(Debug, Error)]
pub enum ErroApi {
    #[error("Mesa inválida: {0}")]
    MesaInvalida(String),

    #[error("A sacola está vazia. Adicione itens antes de enviar o pedido.")]
    CarrinhoVazio,

    #[error("{0}")]
    Validacao(String),

    #[error("{0}")]
    NaoEncontrado(String),

    #[error("Erro interno ao acessar o banco de dados")]
    Banco(#[from] sqlx::Error),
}

impl ResponseError for ErroApi {
    fn status_code(&self) -> StatusCode {
        match self {
            ErroApi::MesaInvalida(_) | ErroApi::CarrinhoVazio | ErroApi::Validacao(_) => {
                StatusCode::BAD_REQUEST
            }
            ErroApi::NaoEncontrado(_) => StatusCode::NOT_FOUND,
            ErroApi::Banco(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ErroApi::Banco(e) = self {
            tracing::error!("erro de banco de dados: {:?}", e);
        }
        HttpResponse::build(self.status_code()).json(RespostaApi::erro(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erros_de_validacao_retornam_400() {
        assert_eq!(
            ErroApi::MesaInvalida("abc".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErroApi::CarrinhoVazio.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErroApi::Validacao("campo obrigatório".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn nao_encontrado_retorna_404() {
        assert_eq!(
            ErroApi::NaoEncontrado("Pedido 99 não encontrado".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
