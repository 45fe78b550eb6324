use crate::capture::Facing;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "food-scanner")]
#[command(about = "Análise nutricional de refeições infantis a partir de fotos", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log de depuração
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analisar uma foto existente
    Analyze {
        /// Arquivo de imagem (sem ele, escolhe-se uma foto da pasta)
        image: Option<PathBuf>,

        /// Pasta para escolher a foto (padrão: diretório atual)
        #[arg(long, conflicts_with = "image")]
        pick: Option<PathBuf>,

        /// Salvar o relatório em JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fotografar a refeição com a câmera e analisar
    Capture {
        /// Câmera a usar (back/front)
        #[arg(short, long, default_value = "back")]
        facing: Facing,

        /// Salvar a foto capturada
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Apenas capturar, sem analisar
        #[arg(long)]
        no_analyze: bool,

        /// Salvar o relatório em JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reenviar a última foto cuja análise falhou
    Retry {
        /// Salvar o relatório em JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuração
    Config {
        /// Definir a chave da API
        #[arg(long)]
        set_api_key: Option<String>,

        /// Mostrar a configuração atual
        #[arg(long)]
        show: bool,
    },
}
