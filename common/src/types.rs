//! Nutrition report types
//!
//! Shape of the JSON the inference endpoint is instructed to return:
//! - FoodItem: one detected food (`alimentos[]`)
//! - NutritionSummary: model-reported totals and balance rating
//! - BabyBenefits: free-text benefit statements per category
//! - AnalysisReport: the whole reply
//!
//! Wire keys are the Portuguese names used in the instruction prompt.

use crate::balance::BalanceRating;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One food detected in the photo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "quantidade_estimada", default, deserialize_with = "null_as_default")]
    pub estimated_quantity: String,

    #[serde(rename = "calorias", deserialize_with = "lenient_number")]
    pub calories: f64,

    #[serde(rename = "proteinas", deserialize_with = "lenient_number")]
    pub protein_g: f64,

    #[serde(rename = "carboidratos", deserialize_with = "lenient_number")]
    pub carbohydrate_g: f64,

    #[serde(rename = "gorduras", deserialize_with = "lenient_number")]
    pub fat_g: f64,

    #[serde(
        rename = "fibras",
        default,
        deserialize_with = "lenient_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fiber_g: Option<f64>,

    #[serde(rename = "vitaminas", default, skip_serializing_if = "Option::is_none")]
    pub vitamins: Option<Vec<String>>,

    #[serde(rename = "minerais", default, skip_serializing_if = "Option::is_none")]
    pub minerals: Option<Vec<String>>,
}

impl FoodItem {
    /// Vitamins followed by minerals, as shown together in the report
    pub fn nutrients(&self) -> impl Iterator<Item = &str> {
        self.vitamins
            .iter()
            .flatten()
            .chain(self.minerals.iter().flatten())
            .map(String::as_str)
    }
}

/// Totals and balance rating reported by the model
///
/// Totals are taken as reported. They are not recomputed from the items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    #[serde(rename = "total_calorias", default, deserialize_with = "lenient_number_or_zero")]
    pub total_calories: f64,

    #[serde(rename = "total_proteinas", default, deserialize_with = "lenient_number_or_zero")]
    pub total_protein_g: f64,

    #[serde(rename = "total_carboidratos", default, deserialize_with = "lenient_number_or_zero")]
    pub total_carbohydrate_g: f64,

    #[serde(rename = "total_gorduras", default, deserialize_with = "lenient_number_or_zero")]
    pub total_fat_g: f64,

    #[serde(rename = "equilibrio", default, deserialize_with = "null_as_default")]
    pub balance: BalanceRating,
}

/// Benefit statements per development area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BabyBenefits {
    #[serde(rename = "desenvolvimento_cerebral", deserialize_with = "null_as_default")]
    pub brain_development: Vec<String>,

    #[serde(rename = "sistema_imunologico", deserialize_with = "null_as_default")]
    pub immune_system: Vec<String>,

    #[serde(rename = "crescimento_ossos", deserialize_with = "null_as_default")]
    pub bone_growth: Vec<String>,

    #[serde(rename = "digestao", deserialize_with = "null_as_default")]
    pub digestion: Vec<String>,

    #[serde(rename = "energia", deserialize_with = "null_as_default")]
    pub energy: Vec<String>,
}

impl BabyBenefits {
    /// Non-empty categories with their display titles, in display order
    pub fn sections(&self) -> Vec<(&'static str, &[String])> {
        [
            ("Desenvolvimento Cerebral", self.brain_development.as_slice()),
            ("Sistema Imunológico", self.immune_system.as_slice()),
            ("Crescimento e Ossos", self.bone_growth.as_slice()),
            ("Digestão", self.digestion.as_slice()),
            ("Energia e Vitalidade", self.energy.as_slice()),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }
}

/// Full analysis reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(rename = "alimentos")]
    pub items: Vec<FoodItem>,

    #[serde(rename = "analise_nutricional", default, deserialize_with = "null_as_default")]
    pub summary: NutritionSummary,

    #[serde(rename = "beneficios_bebe", default, deserialize_with = "null_as_default")]
    pub benefits: BabyBenefits,

    #[serde(rename = "recomendacoes", default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,

    #[serde(rename = "alertas", default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<String>>,
}

/// Macro sums computed from the item list
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ItemTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbohydrate_g: f64,
    pub fat_g: f64,
}

impl AnalysisReport {
    /// Structural checks the JSON shape alone cannot express
    pub fn validate(&self) -> Result<()> {
        for (i, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(Error::Invalid(format!("alimentos[{}].nome is empty", i)));
            }
            let fields = [
                ("calorias", Some(item.calories)),
                ("proteinas", Some(item.protein_g)),
                ("carboidratos", Some(item.carbohydrate_g)),
                ("gorduras", Some(item.fat_g)),
                ("fibras", item.fiber_g),
            ];
            for (key, value) in fields {
                if let Some(v) = value {
                    check_quantity(v, || format!("alimentos[{}].{}", i, key))?;
                }
            }
        }

        let s = &self.summary;
        for (key, v) in [
            ("total_calorias", s.total_calories),
            ("total_proteinas", s.total_protein_g),
            ("total_carboidratos", s.total_carbohydrate_g),
            ("total_gorduras", s.total_fat_g),
        ] {
            check_quantity(v, || format!("analise_nutricional.{}", key))?;
        }

        Ok(())
    }

    pub fn item_totals(&self) -> ItemTotals {
        self.items.iter().fold(ItemTotals::default(), |acc, item| ItemTotals {
            calories: acc.calories + item.calories,
            protein_g: acc.protein_g + item.protein_g,
            carbohydrate_g: acc.carbohydrate_g + item.carbohydrate_g,
            fat_g: acc.fat_g + item.fat_g,
        })
    }

    /// Largest relative gap between a reported total and the item sum
    ///
    /// Returns 0.0 when there are no items.
    pub fn total_divergence(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        let sums = self.item_totals();
        let s = &self.summary;
        [
            (s.total_calories, sums.calories),
            (s.total_protein_g, sums.protein_g),
            (s.total_carbohydrate_g, sums.carbohydrate_g),
            (s.total_fat_g, sums.fat_g),
        ]
        .iter()
        .map(|(reported, summed)| relative_gap(*reported, *summed))
        .fold(0.0, f64::max)
    }

    pub fn alerts(&self) -> &[String] {
        self.alerts.as_deref().unwrap_or(&[])
    }
}

fn check_quantity(value: f64, field: impl Fn() -> String) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Invalid(format!("{} must be a non-negative number, got {}", field(), value)));
    }
    Ok(())
}

fn relative_gap(reported: f64, summed: f64) -> f64 {
    let scale = reported.abs().max(summed.abs());
    if scale == 0.0 {
        0.0
    } else {
        (reported - summed).abs() / scale
    }
}

/// Parse a number the model may have written as `89`, `"89"`, `"12,5 g"` or `"~89 kcal"`
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim().trim_start_matches('~').trim_start();
            let end = s
                .char_indices()
                .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || *c == ',' || (*i == 0 && *c == '-')))
                .map(|(i, _)| i)
                .unwrap_or(s.len());
            let numeric = s[..end].replace(',', ".");
            numeric.parse::<f64>().ok()
        }
        _ => None,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_number(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {}", value)))
}

/// `null` counts as zero for the optional totals
fn lenient_number_or_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_number(deserializer)?.unwrap_or_default())
}

/// `null` for an optional section is the same as leaving it out
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_opt_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    coerce_number(&value)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {}", value)))
}
