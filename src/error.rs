use std::time::Duration;
use thiserror::Error;

/// Generic retry prompt shown for any failed analysis attempt
pub const ANALYSIS_FAILED_MESSAGE: &str = "Não foi possível analisar a imagem. Tente novamente.";

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("camera stream is not ready")]
    StreamNotReady,

    #[error("unreadable image file: {0}")]
    UnreadableFile(String),

    #[error("folder not found: {0}")]
    FolderNotFound(String),

    #[error("inference endpoint error: {0}")]
    Transport(String),

    #[error("could not parse analysis response: {0}")]
    AnalysisParse(String),

    #[error("analysis timed out after {0:?}")]
    AnalysisTimeout(Duration),

    #[error("API key is not configured. Run `food-scanner config --set-api-key YOUR_KEY` or set OPENAI_API_KEY")]
    MissingApiKey,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] food_scanner_common::Error),
}

impl ScannerError {
    /// The one message per failure category that may reach the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            ScannerError::PermissionDenied(_) => {
                "Não foi possível acessar a câmera. Permita o acesso ou escolha uma foto."
            }
            ScannerError::DeviceUnavailable(_) => {
                "Nenhuma câmera disponível. Escolha uma foto do dispositivo."
            }
            ScannerError::StreamNotReady => "A câmera ainda não está pronta. Aguarde e tente novamente.",
            ScannerError::UnreadableFile(_) => {
                "Não foi possível ler a imagem. Escolha outro arquivo."
            }
            ScannerError::FolderNotFound(_) => "Pasta não encontrada. Verifique o caminho.",
            ScannerError::Transport(_)
            | ScannerError::AnalysisParse(_)
            | ScannerError::AnalysisTimeout(_)
            | ScannerError::Common(_) => ANALYSIS_FAILED_MESSAGE,
            ScannerError::MissingApiKey | ScannerError::Config(_) => {
                "Configuração inválida. Verifique a chave da API e as opções."
            }
            ScannerError::Io(_) | ScannerError::Json(_) => "Ocorreu um erro inesperado. Tente novamente.",
        }
    }

    /// Camera failures the caller can recover from by using the file picker
    pub fn suggests_file_picker(&self) -> bool {
        matches!(
            self,
            ScannerError::PermissionDenied(_) | ScannerError::DeviceUnavailable(_)
        )
    }

    /// Failures after a valid image was obtained; the image is worth keeping for `retry`
    pub fn is_analysis_failure(&self) -> bool {
        matches!(
            self,
            ScannerError::Transport(_)
                | ScannerError::AnalysisParse(_)
                | ScannerError::AnalysisTimeout(_)
                | ScannerError::Common(_)
        )
    }

    /// Short category name used in logs and in the retry store
    pub fn category(&self) -> &'static str {
        match self {
            ScannerError::PermissionDenied(_) => "permission_denied",
            ScannerError::DeviceUnavailable(_) => "device_unavailable",
            ScannerError::StreamNotReady => "stream_not_ready",
            ScannerError::UnreadableFile(_) => "unreadable_file",
            ScannerError::FolderNotFound(_) => "folder_not_found",
            ScannerError::Transport(_) => "transport",
            ScannerError::AnalysisParse(_) | ScannerError::Common(_) => "analysis_parse",
            ScannerError::AnalysisTimeout(_) => "analysis_timeout",
            ScannerError::MissingApiKey | ScannerError::Config(_) => "config",
            ScannerError::Io(_) => "io",
            ScannerError::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScannerError>;
