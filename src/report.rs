//! Rendering a resolved ledger for the terminal

use std::fmt;

use crate::calculator::Ledger;
use crate::models::ResourceAmount;

/// Format an amount with at most two decimals, dropping trailing zeros
pub fn format_amount(amount: f64) -> String {
    let formatted = format!("{:.2}", amount);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        s => s.to_string(),
    }
}

/// Summary of a calculation: what was asked for, what to gather, what is left over
#[derive(Debug)]
pub struct Report<'a> {
    pub demands: &'a [ResourceAmount],
    pub ledger: &'a Ledger,
}

impl<'a> Report<'a> {
    pub fn new(demands: &'a [ResourceAmount], ledger: &'a Ledger) -> Self {
        Self { demands, ledger }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Producing:")?;
        for demand in self.demands {
            writeln!(f, "{}", demand)?;
        }

        writeln!(f)?;
        writeln!(f, "Materials:")?;
        for entry in self.ledger.materials() {
            writeln!(f, "{}", entry)?;
        }

        writeln!(f)?;
        writeln!(f, "Byproducts:")?;
        for entry in self.ledger.byproducts() {
            writeln!(f, "{}", entry)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Calculator, ScriptedChooser};
    use crate::recipes::RecipeTable;
    use crate::resource::Resource;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3.0), "3");
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(0.127), "0.13");
        assert_eq!(format_amount(1.0 / 3.0), "0.33");
        assert_eq!(format_amount(100.0), "100");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(-0.001), "0");
    }

    #[test]
    fn test_report_sections() {
        let table = RecipeTable::from_json_str(
            r#"{"recipes": [
                {"outputs": [{"name": "PCON", "amount": 1}, {"name": "MBEAM", "amount": 0.5}],
                 "inputs": [{"name": "CMAT", "amount": 3}, {"name": "COMP", "amount": 20}]}
            ]}"#,
        )
        .unwrap();
        let demands = [ResourceAmount::new(Resource::Pcon, 2.0)];
        let ledger = Calculator::new(&table)
            .resolve(&demands, &mut ScriptedChooser::new([1]))
            .unwrap();

        let text = Report::new(&demands, &ledger).to_string();

        assert_eq!(
            text,
            "Producing:\n2 PCON\n\nMaterials:\n6 CMAT\n40 COMP\n\nByproducts:\n1 MBEAM\n"
        );
    }

    #[test]
    fn test_zero_entries_are_hidden() {
        let demands = [ResourceAmount::new(Resource::Water, 0.0)];
        let ledger = Ledger::from_demands(&demands);

        let text = Report::new(&demands, &ledger).to_string();

        assert_eq!(text, "Producing:\n0 WATER\n\nMaterials:\n\nByproducts:\n");
    }
}
