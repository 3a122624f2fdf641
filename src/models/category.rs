//! Defines the category model and the default category sets offered to new users.

use serde::{Deserialize, Serialize};

use crate::models::TransactionKind;

/// Alias for the opaque identifier assigned to a category by the data store.
pub type CategoryId = String;

/// A user-defined label for transactions.
///
/// Names are not required to be unique. The colour is only ever passed
/// through to the chart layer and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category, referenced by [crate::Transaction::category_id].
    pub id: CategoryId,
    /// The display name of the category.
    pub name: String,
    /// The display colour of the category, e.g. "#EF4444".
    #[serde(default)]
    pub color: String,
}

impl Category {
    /// Create a new category.
    pub fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            color: color.to_owned(),
        }
    }
}

const DEFAULT_EXPENSE_CATEGORIES: [(&str, &str, &str); 8] = [
    ("food", "食費", "#EF4444"),
    ("transport", "交通費", "#3B82F6"),
    ("entertainment", "娯楽費", "#8B5CF6"),
    ("utilities", "光熱費", "#F59E0B"),
    ("communication", "通信費", "#10B981"),
    ("medical", "医療費", "#EC4899"),
    ("education", "教育費", "#06B6D4"),
    ("other-expense", "その他", "#6B7280"),
];

const DEFAULT_INCOME_CATEGORIES: [(&str, &str, &str); 5] = [
    ("salary", "給与", "#10B981"),
    ("bonus", "ボーナス", "#8B5CF6"),
    ("side-job", "副業", "#F59E0B"),
    ("investment", "投資", "#3B82F6"),
    ("other-income", "その他収入", "#6B7280"),
];

/// The starter categories for expenses or income.
pub fn default_categories(kind: TransactionKind) -> Vec<Category> {
    let defaults: &[(&str, &str, &str)] = match kind {
        TransactionKind::Expense => &DEFAULT_EXPENSE_CATEGORIES,
        TransactionKind::Income => &DEFAULT_INCOME_CATEGORIES,
    };

    defaults
        .iter()
        .map(|(id, name, color)| Category::new(id, name, color))
        .collect()
}
