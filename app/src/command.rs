//! Parsing of one line of operator text into a bot command.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    AddCity(String),
    Update {
        region: String,
        parameter: String,
        value: String,
    },
    Show(String),
    Remove(String),
    Map,
    /// A known command with missing arguments; carries the usage line.
    Usage(&'static str),
    Unknown(String),
    /// Free text that is not a command.
    Text(String),
}

pub const USAGE_ADD_CITY: &str = "Usage: /add_city <city/state>";
pub const USAGE_UPDATE: &str = "Usage: /update <state> <parameter> <value>";
pub const USAGE_SHOW: &str = "Usage: /show <state>";
pub const USAGE_REMOVE: &str = "Usage: /remove <city/state>";

impl Command {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let Some(body) = trimmed.strip_prefix('/') else {
            return Self::Text(text.to_string());
        };

        let mut parts = body.split_whitespace();
        let head = parts.next().unwrap_or_default();
        // Group chats address commands as `/cmd@BotName`.
        let name = head.split('@').next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "add_city" if args.is_empty() => Self::Usage(USAGE_ADD_CITY),
            "add_city" => Self::AddCity(args.join(" ")),
            "update" if args.len() < 3 => Self::Usage(USAGE_UPDATE),
            "update" => Self::Update {
                region: args[0].to_string(),
                parameter: args[1].to_string(),
                value: args[2..].join(" "),
            },
            "show" => args
                .first()
                .map_or(Self::Usage(USAGE_SHOW), |state| Self::Show((*state).to_string())),
            "remove" if args.is_empty() => Self::Usage(USAGE_REMOVE),
            "remove" => Self::Remove(args.join(" ")),
            "map" => Self::Map,
            _ => Self::Unknown(head.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/map"), Command::Map);
        assert_eq!(Command::parse("  /MAP  "), Command::Map);
        assert_eq!(Command::parse("/map@HealthRiskBot"), Command::Map);
    }

    #[test]
    fn test_parse_add_and_remove_join_arguments() {
        assert_eq!(
            Command::parse("/add_city New   Delhi"),
            Command::AddCity("New Delhi".to_string())
        );
        assert_eq!(
            Command::parse("/remove Tamil Nadu"),
            Command::Remove("Tamil Nadu".to_string())
        );
    }

    #[test]
    fn test_parse_update_joins_value() {
        assert_eq!(
            Command::parse("/update Lagos risk_level High Risk"),
            Command::Update {
                region: "Lagos".to_string(),
                parameter: "risk_level".to_string(),
                value: "High Risk".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_show_uses_first_argument() {
        assert_eq!(
            Command::parse("/show Kerala extra"),
            Command::Show("Kerala".to_string())
        );
    }

    #[test]
    fn test_parse_missing_arguments() {
        assert_eq!(Command::parse("/add_city"), Command::Usage(USAGE_ADD_CITY));
        assert_eq!(Command::parse("/update Lagos risk"), Command::Usage(USAGE_UPDATE));
        assert_eq!(Command::parse("/show"), Command::Usage(USAGE_SHOW));
        assert_eq!(Command::parse("/remove   "), Command::Usage(USAGE_REMOVE));
    }

    #[test]
    fn test_parse_unknown_and_text() {
        assert_eq!(
            Command::parse("/teleport Mars"),
            Command::Unknown("teleport".to_string())
        );
        assert_eq!(
            Command::parse("hello there"),
            Command::Text("hello there".to_string())
        );
    }
}
