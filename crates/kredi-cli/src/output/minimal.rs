use serde_json::Value;

/// Print just the key figure from the output.
///
/// Equal-installment plans print the installment actually charged (first
/// row, amortized commission included), other plans the total loan cost,
/// and calendars the final payment date.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(answer) = key_figure(result) {
        println!("{}", format_minimal(answer));
        return;
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result));
}

fn key_figure(result: &Value) -> Option<&Value> {
    match result {
        Value::Object(map) => {
            let level_plan = map.get("level_installment").is_some_and(|v| !v.is_null());
            let first_installment = map
                .get("installments")
                .and_then(|rows| rows.get(0))
                .and_then(|row| row.get("installment_amount"));
            match first_installment {
                Some(amount) if level_plan => Some(amount),
                _ => map.get("totals").and_then(|t| t.get("total_loan_cost")),
            }
        }
        Value::Array(entries) => entries.last().and_then(|e| e.get("payment_date")),
        _ => None,
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
