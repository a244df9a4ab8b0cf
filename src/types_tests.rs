//! Tests for core domain types

#[cfg(test)]
mod tests {
    use super::super::types::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Long.opposite(), Side::Short);
        assert_eq!(Side::Short.opposite(), Side::Long);
        assert_eq!(Side::Long.opposite().opposite(), Side::Long);
    }

    #[test]
    fn test_order_action_labels() {
        assert_eq!(OrderAction::NewOrder.to_string(), "New Order");
        assert_eq!(OrderAction::StopLoss.to_string(), "Stop Loss");
        assert_eq!(OrderAction::TakeProfit.to_string(), "Take Profit");
        assert_eq!(OrderAction::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_profit_basis_parsing() {
        assert_eq!("realized".parse::<ProfitBasis>().unwrap(), ProfitBasis::Realized);
        assert_eq!("gross".parse::<ProfitBasis>().unwrap(), ProfitBasis::Gross);
        // the journal column names are accepted too
        assert_eq!(
            "Realized Profit".parse::<ProfitBasis>().unwrap(),
            ProfitBasis::Realized
        );
        assert_eq!(
            "Gross Profit".parse::<ProfitBasis>().unwrap(),
            ProfitBasis::Gross
        );
        assert!("net".parse::<ProfitBasis>().is_err());
    }

    #[test]
    fn test_profit_basis_display() {
        assert_eq!(ProfitBasis::Realized.to_string(), "Realized Profit");
        assert_eq!(ProfitBasis::Gross.to_string(), "Gross Profit");
    }

    #[test]
    fn test_timeframe_parsing_is_case_insensitive() {
        assert_eq!("daily".parse::<Timeframe>().unwrap(), Timeframe::Daily);
        assert_eq!("Weekly".parse::<Timeframe>().unwrap(), Timeframe::Weekly);
        assert_eq!("MONTHLY".parse::<Timeframe>().unwrap(), Timeframe::Monthly);
        assert!("yearly".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_timeframe_display_is_capitalized() {
        assert_eq!(Timeframe::Daily.to_string(), "Daily");
        assert_eq!(Timeframe::Weekly.to_string(), "Weekly");
        assert_eq!(Timeframe::Monthly.to_string(), "Monthly");
    }

    #[test]
    fn test_session_labels() {
        assert_eq!(TradingSession::Sydney.label(), "Sydney");
        assert_eq!(TradingSession::NewYork.label(), "New York");
        assert_eq!(TradingSession::NewYork.to_string(), "New York");
    }
}
