// src/shared/shared_structs.rs

use serde::Serialize;

/// Envelope padrão de todas as respostas da API: `{success, message?, ...payload}`.
/// 'T' é a struct de payload da rota; seus campos são achatados ("flatten")
/// no mesmo nível de `success` e `message`, seguindo o contrato dos clientes.
#[derive(Serialize)]
pub struct RespostaApi<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
}

impl<T: Serialize> RespostaApi<T> {
    /// Resposta de sucesso com payload e mensagem.
    pub fn sucesso(message: impl Into<String>, body: T) -> Self {
        RespostaApi {
            success: true,
            message: Some(message.into()),
            body: Some(body),
        }
    }

    /// Resposta de sucesso apenas com payload (sem mensagem).
    pub fn payload(body: T) -> Self {
        RespostaApi {
            success: true,
            message: None,
            body: Some(body),
        }
    }
}

impl RespostaApi<()> {
    /// Resposta de sucesso sem payload.
    pub fn mensagem(message: impl Into<String>) -> Self {
        RespostaApi {
            success: true,
            message: Some(message.into()),
            body: None,
        }
    }

    /// Resposta de erro no mesmo envelope (`success: false`).
    pub fn erro(message: impl Into<String>) -> Self {
        RespostaApi {
            success: false,
            message: Some(message.into()),
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Payload {
        orders: Vec<i32>,
    }

    #[test]
    fn envelope_de_sucesso_achata_o_payload() {
        let resposta = RespostaApi::sucesso("ok", Payload { orders: vec![1, 2] });
        let json = serde_json::to_value(&resposta).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "ok");
        // O payload não aparece aninhado em "body"
        assert_eq!(json["orders"], serde_json::json!([1, 2]));
        assert!(json.get("body").is_none());
    }

    #[test]
    fn envelope_de_erro_nao_serializa_payload() {
        let resposta = RespostaApi::erro("falhou");
        let json = serde_json::to_value(&resposta).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "falhou");
    }
}
