//! Food Scanner Common Library
//!
//! Report types, instruction prompts, response parsing and balance
//! classification shared by every front end of the food scanner.

pub mod balance;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod types;

pub use balance::{balance_color, balance_label, BalanceRating};
pub use error::{Error, Result};
pub use parser::{parse_report, strip_code_fences};
pub use prompts::{SYSTEM_PROMPT, USER_PROMPT};
pub use types::{AnalysisReport, BabyBenefits, FoodItem, ItemTotals, NutritionSummary};
