//! JSON output formatting.

use tally_core::storage::Expense;
use tally_core::summary::MonthlyBreakdown;

/// Convert an expense to JSON for output.
pub fn expense_json(expense: &Expense) -> serde_json::Value {
    serde_json::json!({
        "id": expense.id,
        "date": expense.date,
        "amount": expense.amount,
        "category": expense.category,
        "note": expense.note,
    })
}

/// Expense list with its count and total.
pub fn expense_list_json(expenses: &[Expense]) -> serde_json::Value {
    let total: tally_core::Amount = expenses.iter().map(|e| e.amount).sum();
    serde_json::json!({
        "count": expenses.len(),
        "total": total,
        "expenses": expenses.iter().map(expense_json).collect::<Vec<_>>(),
    })
}

/// Monthly breakdown, categories ranked by amount.
pub fn breakdown_json(breakdown: &MonthlyBreakdown) -> serde_json::Value {
    let categories: Vec<serde_json::Value> = breakdown
        .ranked()
        .into_iter()
        .map(|(category, amount)| {
            serde_json::json!({
                "category": category,
                "amount": amount,
                "share": breakdown.share(category).map(|s| s.to_string()),
            })
        })
        .collect();
    serde_json::json!({
        "month": breakdown.label(),
        "total": breakdown.total(),
        "categories": categories,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use tally_core::Amount;

    use super::*;

    fn expense(id: i64, minor: i64, category: &str) -> Expense {
        Expense {
            id,
            date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            amount: Amount::from_minor(minor),
            category: category.to_string(),
            note: "coffee".to_string(),
        }
    }

    #[test]
    fn test_expense_json_shape() {
        let value = expense_json(&expense(2, 725, "Food"));
        assert_eq!(value["id"], 2);
        assert_eq!(value["date"], "2024-01-20");
        assert_eq!(value["amount"], "7.25");
        assert_eq!(value["note"], "coffee");
    }

    #[test]
    fn test_list_json_totals() {
        let value = expense_list_json(&[expense(1, 1250, "Food"), expense(2, 725, "Food")]);
        assert_eq!(value["count"], 2);
        assert_eq!(value["total"], "19.75");
        assert_eq!(value["expenses"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_breakdown_json() {
        let breakdown = MonthlyBreakdown {
            year: 2024,
            month: 1,
            totals: BTreeMap::from([
                ("Food".to_string(), Amount::from_minor(1975)),
                ("Rent".to_string(), Amount::from_minor(3025)),
            ]),
        };
        let value = breakdown_json(&breakdown);
        assert_eq!(value["month"], "2024-01");
        assert_eq!(value["total"], "50.00");
        assert_eq!(value["categories"][0]["category"], "Rent");
        assert_eq!(value["categories"][0]["share"], "60.5");
        assert_eq!(value["categories"][1]["share"], "39.5");
    }
}
