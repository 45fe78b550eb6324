//! Plain-text rendering of an analysis report

use food_scanner_common::AnalysisReport;
use std::fmt;

/// Drop a trailing `.0` so whole numbers print as `89`, not `89.0`
fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Display adapter for a report
pub struct ReportView<'a>(pub &'a AnalysisReport);

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let summary = &report.summary;

        writeln!(f, "Equilíbrio Nutricional")?;
        writeln!(f, "  {} [{}]", summary.balance.label(), summary.balance.color())?;
        writeln!(
            f,
            "  Calorias: {} kcal | Proteínas: {}g | Carboidratos: {}g | Gorduras: {}g",
            number(summary.total_calories),
            number(summary.total_protein_g),
            number(summary.total_carbohydrate_g),
            number(summary.total_fat_g),
        )?;

        writeln!(f, "\nAlimentos Identificados")?;
        if report.items.is_empty() {
            writeln!(f, "  (nenhum alimento identificado)")?;
        }
        for item in &report.items {
            writeln!(
                f,
                "  • {} ({}) - {} kcal",
                item.name,
                if item.estimated_quantity.is_empty() { "?" } else { item.estimated_quantity.as_str() },
                number(item.calories)
            )?;
            writeln!(
                f,
                "    Proteínas {}g · Carboidratos {}g · Gorduras {}g",
                number(item.protein_g),
                number(item.carbohydrate_g),
                number(item.fat_g)
            )?;
            let nutrients: Vec<&str> = item.nutrients().collect();
            if !nutrients.is_empty() {
                writeln!(f, "    Vitaminas e Minerais: {}", nutrients.join(", "))?;
            }
        }

        let sections = report.benefits.sections();
        if !sections.is_empty() {
            writeln!(f, "\nBenefícios para o Bebê")?;
            for (title, items) in sections {
                writeln!(f, "  {}", title)?;
                for benefit in items {
                    writeln!(f, "    • {}", benefit)?;
                }
            }
        }

        if !report.recommendations.is_empty() {
            writeln!(f, "\nRecomendações")?;
            for r in &report.recommendations {
                writeln!(f, "  ✔ {}", r)?;
            }
        }

        if !report.alerts().is_empty() {
            writeln!(f, "\nAlertas Importantes")?;
            for a in report.alerts() {
                writeln!(f, "  ⚠ {}", a)?;
            }
        }

        Ok(())
    }
}

pub fn render(report: &AnalysisReport) -> String {
    ReportView(report).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use food_scanner_common::parse_report;

    #[test]
    fn test_render_full_report() {
        let report = parse_report(
            r#"{
                "alimentos": [{
                    "nome": "banana", "quantidade_estimada": "1 unidade",
                    "calorias": 89, "proteinas": 1.1, "carboidratos": 22.8, "gorduras": 0.3,
                    "vitaminas": ["B6"], "minerais": ["Potássio"]
                }],
                "analise_nutricional": {
                    "total_calorias": 89, "total_proteinas": 1.1,
                    "total_carboidratos": 22.8, "total_gorduras": 0.3,
                    "equilibrio": "excelente"
                },
                "beneficios_bebe": {"energia": ["Energia rápida"]},
                "recomendacoes": ["Adicionar aveia"],
                "alertas": ["Cuidado com engasgo"]
            }"#,
        )
        .unwrap();

        let text = render(&report);
        assert!(text.contains("Excelente equilíbrio nutricional!"));
        assert!(text.contains("[green]"));
        assert!(text.contains("banana (1 unidade) - 89 kcal"));
        assert!(text.contains("Carboidratos 22.8g"));
        assert!(text.contains("Vitaminas e Minerais: B6, Potássio"));
        assert!(text.contains("Energia e Vitalidade"));
        assert!(text.contains("Adicionar aveia"));
        assert!(text.contains("Cuidado com engasgo"));
    }

    #[test]
    fn test_render_sparse_report() {
        let report = parse_report(r#"{"alimentos": []}"#).unwrap();
        let text = render(&report);
        assert!(text.contains("Análise em andamento..."));
        assert!(text.contains("nenhum alimento identificado"));
        assert!(!text.contains("Recomendações"));
        assert!(!text.contains("Alertas"));
    }

    #[test]
    fn test_number_format() {
        assert_eq!(number(89.0), "89");
        assert_eq!(number(1.1), "1.1");
        assert_eq!(number(0.26), "0.3");
    }

    #[test]
    fn test_view_writes_into_any_formatter() {
        let report = parse_report(r#"{"alimentos": [], "recomendacoes": ["Mais legumes"]}"#).unwrap();
        let mut out = String::new();
        fmt::write(&mut out, format_args!("{}", ReportView(&report))).unwrap();
        assert_eq!(out, render(&report));
        assert!(out.contains("✔ Mais legumes"));
    }
}
