// src/clientes/telefone.rs
//
// Máscara de celular brasileiro. A forma canônica de um telefone — usada
// como chave de busca do cliente e gravada no banco — é apenas dígitos;
// a máscara `(DD) 9XXXX-XXXX` existe só para exibição e digitação.

/// Remove a máscara: devolve apenas os dígitos da entrada.
pub fn remover_mascara(entrada: &str) -> String {
    entrada.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Aplica a máscara progressivamente conforme a quantidade de dígitos,
/// para ser chamada a cada tecla digitada. Pura e determinística; dígitos
/// além do décimo primeiro são descartados.
///
/// 0–2 dígitos  -> `(DD`
/// 3–6 dígitos  -> `(DD) XXXX`
/// 7–10 dígitos -> `(DD) XXXXX-XXX`
/// 11+ dígitos  -> `(DD) 9XXXX-XXXX`
pub fn aplicar_mascara(entrada: &str) -> String {
    let digitos = remover_mascara(entrada);

    if digitos.len() <= 2 {
        format!("({}", digitos)
    } else if digitos.len() <= 6 {
        format!("({}) {}", &digitos[..2], &digitos[2..])
    } else if digitos.len() <= 10 {
        format!("({}) {}-{}", &digitos[..2], &digitos[2..7], &digitos[7..])
    } else {
        format!("({}) {}-{}", &digitos[..2], &digitos[2..7], &digitos[7..11])
    }
}

/// Forma de gravação de um campo de telefone: números reais (10 ou mais
/// dígitos) são gravados na forma canônica; valores mais curtos — como o
/// rótulo "mesa N" dos pedidos de comanda — ficam como vieram.
pub fn forma_de_gravacao(valor: &str) -> String {
    let canonico = remover_mascara(valor);
    if canonico.len() >= 10 {
        canonico
    } else {
        valor.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mascara_progressiva_por_tamanho() {
        // Tabela de fronteiras: 0, 2, 6, 10, 11 e mais de 11 dígitos
        assert_eq!(aplicar_mascara(""), "(");
        assert_eq!(aplicar_mascara("11"), "(11");
        assert_eq!(aplicar_mascara("119123"), "(11) 9123");
        assert_eq!(aplicar_mascara("1191234567"), "(11) 91234-567");
        assert_eq!(aplicar_mascara("11912345678"), "(11) 91234-5678");
        // Dígitos além do décimo primeiro são truncados
        assert_eq!(aplicar_mascara("119123456789"), "(11) 91234-5678");
    }

    #[test]
    fn mascara_ignora_o_que_nao_e_digito() {
        assert_eq!(aplicar_mascara("(11) 91234-5678"), "(11) 91234-5678");
        assert_eq!(aplicar_mascara("11 9 1234 5678"), "(11) 91234-5678");
        assert_eq!(aplicar_mascara("abc"), "(");
    }

    #[test]
    fn remover_mascara_devolve_apenas_digitos() {
        assert_eq!(remover_mascara("(11) 91234-5678"), "11912345678");
        assert_eq!(remover_mascara("mesa 5"), "5");
        assert_eq!(remover_mascara(""), "");
    }

    #[test]
    fn forma_de_gravacao_preserva_rotulos_de_mesa() {
        // Telefones reais vão para a forma canônica
        assert_eq!(forma_de_gravacao("(11) 91234-5678"), "11912345678");
        assert_eq!(forma_de_gravacao("1133334444"), "1133334444");
        // "mesa N" e afins não são telefones e ficam como vieram
        assert_eq!(forma_de_gravacao("mesa 5"), "mesa 5");
        assert_eq!(forma_de_gravacao("91234-567"), "91234-567");
        assert_eq!(forma_de_gravacao(""), "");
    }

    #[test]
    fn mascarar_e_desmascarar_preserva_os_digitos() {
        // remover(aplicar(x)) == remover(x), até o limite de 11 dígitos
        for entrada in ["", "1", "11", "119", "119123", "1191234567", "11912345678"] {
            assert_eq!(
                remover_mascara(&aplicar_mascara(entrada)),
                remover_mascara(entrada)
            );
        }
    }
}
