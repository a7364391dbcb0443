//! User-triggerable actions

use super::category::Category;

/// What activating a selector (or typing a command) asks the dashboard to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectCategory(Category),
    SelectMetric { category: Category, metric: String },
    RenderPrediction,
    /// Print the current document state
    Show,
    Quit,
}

impl Action {
    /// Parse a command line such as `metric btc Close`
    pub fn parse(line: &str) -> Result<Action, String> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            return Err("Empty command".to_string());
        };

        match command.to_lowercase().as_str() {
            "category" | "cat" => match args {
                [id] => Ok(Action::SelectCategory(Category::from(*id))),
                _ => Err("Usage: category <id>".to_string()),
            },
            // metric names may contain spaces
            "metric" | "m" if args.len() >= 2 => Ok(Action::SelectMetric {
                category: Category::from(args[0]),
                metric: args[1..].join(" "),
            }),
            "metric" | "m" => Err("Usage: metric <category> <name>".to_string()),
            "predict" => Ok(Action::RenderPrediction),
            "show" => Ok(Action::Show),
            "quit" | "exit" => Ok(Action::Quit),
            other => Err(format!("Unknown command '{}'", other)),
        }
    }

    /// Encoded form used in rendered selector markup
    pub fn to_attr(&self) -> String {
        match self {
            Action::SelectCategory(category) => format!("category {}", category),
            Action::SelectMetric { category, metric } => format!("metric {} {}", category, metric),
            Action::RenderPrediction => "predict".to_string(),
            Action::Show => "show".to_string(),
            Action::Quit => "quit".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric_with_spaces() {
        let action = Action::parse("metric fred Federal Funds Rate").unwrap();
        assert_eq!(
            action,
            Action::SelectMetric {
                category: Category::Fred,
                metric: "Federal Funds Rate".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_round_trips_selector_attr() {
        let action = Action::SelectMetric {
            category: Category::BtcEtf,
            metric: "IBIT".to_string(),
        };
        assert_eq!(Action::parse(&action.to_attr()).unwrap(), action);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Action::parse("").is_err());
        assert!(Action::parse("metric btc").is_err());
        assert!(Action::parse("launch").is_err());
    }
}
