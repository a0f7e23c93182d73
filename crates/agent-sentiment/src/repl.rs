//! Line commands for the interactive session

use crate::error::{Result, SentimentError};
use crate::market::LookbackPeriod;
use crate::presets;

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Analyze a ticker list
    Analyze { tickers: String },
    /// Analyze a named preset
    Preset { name: String },
    /// List the presets
    Presets,
    /// Change the lookback period
    Period { period: LookbackPeriod },
    /// Run the environment check
    Check,
    /// Show help
    Help,
    /// Leave the session
    Exit,
}

impl ReplCommand {
    /// Parse a line; anything that is not a command is a ticker list
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SentimentError::EmptyInput);
        }

        let Some(command) = input.strip_prefix('/') else {
            return Ok(Self::Analyze {
                tickers: input.to_string(),
            });
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.collect::<Vec<_>>().join(" ");

        match name.as_str() {
            "preset" | "p" => {
                if arg.is_empty() {
                    return Err(SentimentError::ConfigError(
                        "Missing preset name, try /presets".to_string(),
                    ));
                }
                if presets::find(&arg).is_none() {
                    return Err(SentimentError::ConfigError(format!(
                        "Unknown preset: {arg}"
                    )));
                }
                Ok(Self::Preset { name: arg })
            }
            "presets" => Ok(Self::Presets),
            "period" => Ok(Self::Period {
                period: arg.parse()?,
            }),
            "check" => Ok(Self::Check),
            "help" | "h" | "?" => Ok(Self::Help),
            "exit" | "quit" | "q" => Ok(Self::Exit),
            _ => Err(SentimentError::ConfigError(format!(
                "Unknown command: /{name}"
            ))),
        }
    }

    /// Help text for the session
    pub fn help_text() -> &'static str {
        r"
Portfolio Sentiment Commands
============================

  AAPL, MSFT, TSLA     Analyze a comma- or newline-separated ticker list
  /preset <name>       Analyze a preset portfolio (/p)
  /presets             List presets
  /period <range>      Set the lookback period (1mo, 3mo, 6mo, 1y, ...)
  /check               Check market data, API key, and network
  /help                Show help
  /exit                Exit (/quit, /q)
"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_ticker_list() {
        assert_eq!(
            ReplCommand::parse("  aapl, msft ").unwrap(),
            ReplCommand::Analyze {
                tickers: "aapl, msft".to_string()
            }
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ReplCommand::parse("/preset tech").unwrap(),
            ReplCommand::Preset {
                name: "tech".to_string()
            }
        );
        assert_eq!(ReplCommand::parse("/presets").unwrap(), ReplCommand::Presets);
        assert_eq!(
            ReplCommand::parse("/period 1Y").unwrap(),
            ReplCommand::Period {
                period: LookbackPeriod::OneYear
            }
        );
        assert_eq!(ReplCommand::parse("/HELP").unwrap(), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/q").unwrap(), ReplCommand::Exit);
        assert_eq!(ReplCommand::parse("/check").unwrap(), ReplCommand::Check);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ReplCommand::parse("   "),
            Err(SentimentError::EmptyInput)
        ));
        assert!(ReplCommand::parse("/preset").is_err());
        assert!(ReplCommand::parse("/preset crypto").is_err());
        assert!(ReplCommand::parse("/period forever").is_err());
        assert!(ReplCommand::parse("/bogus").is_err());
    }
}
