//! Instruction prompts
//!
//! Both texts are fixed: the system prompt sets the infant-nutrition
//! persona, the user prompt embeds the exact JSON shape of
//! [`AnalysisReport`](crate::types::AnalysisReport).

/// Persona and output contract
pub const SYSTEM_PROMPT: &str = "Você é um nutricionista especializado em alimentação infantil e materna.
Analise a imagem da refeição e forneça informações nutricionais detalhadas.
Foque em como cada alimento contribui para o desenvolvimento saudável do bebê.
Retorne APENAS um JSON válido, sem texto adicional.";

/// Report schema description sent alongside the image
pub const USER_PROMPT: &str = r#"Analise esta refeição e retorne um JSON com a seguinte estrutura:
{
  "alimentos": [
    {
      "nome": "nome do alimento",
      "quantidade_estimada": "quantidade aproximada",
      "calorias": número,
      "proteinas": número em gramas,
      "carboidratos": número em gramas,
      "gorduras": número em gramas,
      "fibras": número em gramas (opcional),
      "vitaminas": ["lista de vitaminas principais"],
      "minerais": ["lista de minerais principais"]
    }
  ],
  "analise_nutricional": {
    "total_calorias": soma total,
    "total_proteinas": soma total,
    "total_carboidratos": soma total,
    "total_gorduras": soma total,
    "equilibrio": "excelente" | "bom" | "regular" | "precisa_melhorar"
  },
  "beneficios_bebe": {
    "desenvolvimento_cerebral": ["benefícios específicos"],
    "sistema_imunologico": ["benefícios específicos"],
    "crescimento_ossos": ["benefícios específicos"],
    "digestao": ["benefícios específicos"],
    "energia": ["benefícios específicos"]
  },
  "recomendacoes": ["sugestões para melhorar a refeição"],
  "alertas": ["avisos sobre alergênicos ou cuidados"] (opcional)
}"#;

/// Balance rating values the prompt allows
pub const BALANCE_VALUES: &[&str] = &["excelente", "bom", "regular", "precisa_melhorar"];
