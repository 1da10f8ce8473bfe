//! Tipos de erro para o cliente da API de integração POS.
//!
//! Define [`PosApiError`] com variantes específicas para status HTTP fora do
//! esperado, resposta de job sem `resource_url` e falhas de rede. Usa
//! `thiserror` para derivar `Display` e `Error` automaticamente a partir dos
//! atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com o serviço de integração POS.
///
/// As variantes cobrem os três cenários de falha do cliente:
/// - [`UnexpectedStatus`](PosApiError::UnexpectedStatus): o servidor respondeu com um status fora do contrato
/// - [`MissingResourceUrl`](PosApiError::MissingResourceUrl): job aceito sem `resource_url` no corpo
/// - [`Network`](PosApiError::Network): falha na camada de transporte
#[derive(Debug, Error)]
pub enum PosApiError {
    /// O servidor respondeu com um status HTTP diferente do esperado para a
    /// chamada (202 para submissão e atualização, 2xx para polling).
    /// Contém o código e o corpo da resposta para diagnóstico.
    #[error("API error (status {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// O job de menu foi aceito mas a resposta não trouxe o `resource_url`
    /// necessário para o polling.
    #[error("menu job accepted without a resource_url in the response")]
    MissingResourceUrl,

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    /// Encapsula o erro original do `reqwest` via `#[from]`.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_display() {
        let err = PosApiError::UnexpectedStatus {
            status: 404,
            body: "venue not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 404): venue not found");
    }

    #[test]
    fn missing_resource_url_display() {
        let err = PosApiError::MissingResourceUrl;
        assert_eq!(
            err.to_string(),
            "menu job accepted without a resource_url in the response"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PosApiError>();
    }
}
