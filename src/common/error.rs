use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Erro de entrada com mensagem pronta para o usuário (datas, confirmação...)
    #[error("{0}")]
    InvalidInput(String),

    #[error("Confirmação obrigatória")]
    ConfirmationRequired,

    #[error("Lote {0} não encontrado")]
    BatchNotFound(i64),

    #[error("Lote {0} já foi vendido")]
    BatchAlreadySold(i64),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar documento: {0}")]
    DocumentError(String),

    #[error("Erro de planilha: {0}")]
    SpreadsheetError(#[from] rust_xlsxwriter::XlsxError),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(message) => {
                let body = Json(json!({ "error": message }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ConfirmationRequired => (
                StatusCode::BAD_REQUEST,
                "Please confirm this action before continuing.",
            ),
            AppError::BatchNotFound(_) => (StatusCode::NOT_FOUND, "Batch not found."),
            AppError::BatchAlreadySold(_) => (StatusCode::CONFLICT, "This batch has already been sold."),

            // Todos os outros erros (banco, documento, interno) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong. Please try again.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
