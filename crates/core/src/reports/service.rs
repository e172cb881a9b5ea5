//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::accounts::account::{AccountNature, AccountType};

use super::types::{
    AccountTotals, BalanceSheetReport, IncomeStatementReport, ReportSection, SectionRow,
    TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals,
};

/// Service for assembling financial reports from per-account totals.
pub struct ReportService;

impl ReportService {
    /// Computes an account's balance from its totals.
    ///
    /// Debit-nature: `opening + debits - credits`.
    /// Credit-nature: `opening + credits - debits`.
    #[must_use]
    pub fn account_balance(totals: &AccountTotals) -> Decimal {
        totals.opening_balance
            + totals
                .nature
                .balance_change(totals.total_debit, totals.total_credit)
    }

    /// Generates a trial balance report.
    ///
    /// One row per account with raw debit/credit totals; the report totals
    /// must balance to the cent for a healthy ledger.
    #[must_use]
    pub fn trial_balance(
        mut accounts: Vec<AccountTotals>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> TrialBalanceReport {
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit: Decimal = accounts.iter().map(|a| a.total_debit).sum();
        let total_credit: Decimal = accounts.iter().map(|a| a.total_credit).sum();

        let rows = accounts
            .into_iter()
            .map(|a| TrialBalanceRow {
                code: a.code,
                name: a.name,
                total_debit: a.total_debit,
                total_credit: a.total_credit,
            })
            .collect();

        TrialBalanceReport {
            from,
            to,
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: total_debit == total_credit,
            },
        }
    }

    /// Generates a balance sheet report.
    ///
    /// Assets, liabilities, and equity are rolled up by account type with
    /// each type's sign convention; revenue and expense activity enters the
    /// equity side as current earnings, so a balanced ledger always shows
    /// Assets = Liabilities + Equity.
    #[must_use]
    pub fn balance_sheet(
        mut accounts: Vec<AccountTotals>,
        as_of: Option<NaiveDate>,
    ) -> BalanceSheetReport {
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let mut assets = ReportSection::default();
        let mut liabilities = ReportSection::default();
        let mut equity = ReportSection::default();
        let mut current_earnings = Decimal::ZERO;

        for account in &accounts {
            let balance = Self::account_balance(account);
            let row = SectionRow {
                code: account.code.clone(),
                name: account.name.clone(),
                balance,
            };
            match account.account_type {
                AccountType::Asset => assets.push(row),
                AccountType::Liability => liabilities.push(row),
                AccountType::Equity => equity.push(row),
                AccountType::Revenue => current_earnings += balance,
                AccountType::Expense => current_earnings -= balance,
            }
        }

        let total_assets = assets.total;
        let liabilities_and_equity = liabilities.total + equity.total + current_earnings;

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
            current_earnings,
            total_assets,
            liabilities_and_equity,
            is_balanced: total_assets == liabilities_and_equity,
        }
    }

    /// Generates an income statement report.
    ///
    /// Revenue and expense balances are shown positive under each type's
    /// nature convention; net income is revenue minus expenses.
    #[must_use]
    pub fn income_statement(
        mut accounts: Vec<AccountTotals>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> IncomeStatementReport {
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let mut revenue = ReportSection::default();
        let mut expenses = ReportSection::default();

        for account in &accounts {
            let balance = Self::account_balance(account);
            let row = SectionRow {
                code: account.code.clone(),
                name: account.name.clone(),
                balance,
            };
            match account.account_type {
                AccountType::Revenue => revenue.push(row),
                AccountType::Expense => expenses.push(row),
                _ => {}
            }
        }

        let net_income = revenue.total - expenses.total;

        IncomeStatementReport {
            from,
            to,
            revenue,
            expenses,
            net_income,
        }
    }

    /// Computes running balances for an account ledger listing.
    ///
    /// `rows` must be ordered; each element is `(debit, credit)`. Returns
    /// the balance after each row, starting from `opening_balance`.
    #[must_use]
    pub fn running_balances(
        nature: AccountNature,
        opening_balance: Decimal,
        rows: &[(Decimal, Decimal)],
    ) -> Vec<Decimal> {
        let mut balance = opening_balance;
        rows.iter()
            .map(|&(debit, credit)| {
                balance += nature.balance_change(debit, credit);
                balance
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn totals(
        code: &str,
        account_type: AccountType,
        opening: Decimal,
        debit: Decimal,
        credit: Decimal,
    ) -> AccountTotals {
        AccountTotals {
            account_id: Uuid::now_v7(),
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type,
            nature: account_type.default_nature(),
            opening_balance: opening,
            total_debit: debit,
            total_credit: credit,
        }
    }

    #[test]
    fn test_account_balance_debit_nature() {
        let t = totals("1111", AccountType::Asset, dec!(50), dec!(115), dec!(15));
        assert_eq!(ReportService::account_balance(&t), dec!(150));
    }

    #[test]
    fn test_account_balance_credit_nature() {
        let t = totals("4111", AccountType::Revenue, dec!(0), dec!(10), dec!(110));
        assert_eq!(ReportService::account_balance(&t), dec!(100));
    }

    #[test]
    fn test_trial_balance_totals_and_ordering() {
        let report = ReportService::trial_balance(
            vec![
                totals("4111", AccountType::Revenue, dec!(0), dec!(0), dec!(100)),
                totals("1111", AccountType::Asset, dec!(0), dec!(115), dec!(0)),
                totals("2141", AccountType::Liability, dec!(0), dec!(0), dec!(15)),
            ],
            None,
            None,
        );

        assert_eq!(report.totals.total_debit, dec!(115));
        assert_eq!(report.totals.total_credit, dec!(115));
        assert!(report.totals.is_balanced);

        let codes: Vec<&str> = report.rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["1111", "2141", "4111"]);
    }

    #[test]
    fn test_trial_balance_detects_imbalance() {
        let report = ReportService::trial_balance(
            vec![
                totals("1111", AccountType::Asset, dec!(0), dec!(115), dec!(0)),
                totals("4111", AccountType::Revenue, dec!(0), dec!(0), dec!(114)),
            ],
            None,
            None,
        );
        assert!(!report.totals.is_balanced);
    }

    #[test]
    fn test_balance_sheet_balances_with_current_earnings() {
        // Cash sale: cash 115 (asset), revenue 100, VAT due 15 (liability).
        let report = ReportService::balance_sheet(
            vec![
                totals("1111", AccountType::Asset, dec!(0), dec!(115), dec!(0)),
                totals("2141", AccountType::Liability, dec!(0), dec!(0), dec!(15)),
                totals("4111", AccountType::Revenue, dec!(0), dec!(0), dec!(100)),
            ],
            None,
        );

        assert_eq!(report.total_assets, dec!(115));
        assert_eq!(report.liabilities.total, dec!(15));
        assert_eq!(report.current_earnings, dec!(100));
        assert_eq!(report.liabilities_and_equity, dec!(115));
        assert!(report.is_balanced);
    }

    #[test]
    fn test_balance_sheet_expense_reduces_earnings() {
        // Expense paid from cash: rent 40.
        let report = ReportService::balance_sheet(
            vec![
                totals("1111", AccountType::Asset, dec!(100), dec!(0), dec!(40)),
                totals("3100", AccountType::Equity, dec!(100), dec!(0), dec!(0)),
                totals("5100", AccountType::Expense, dec!(0), dec!(40), dec!(0)),
            ],
            None,
        );

        assert_eq!(report.total_assets, dec!(60));
        assert_eq!(report.current_earnings, dec!(-40));
        assert_eq!(report.liabilities_and_equity, dec!(60));
        assert!(report.is_balanced);
    }

    #[test]
    fn test_income_statement() {
        let report = ReportService::income_statement(
            vec![
                totals("4111", AccountType::Revenue, dec!(0), dec!(0), dec!(500)),
                totals("5100", AccountType::Expense, dec!(0), dec!(120), dec!(0)),
                totals("1111", AccountType::Asset, dec!(0), dec!(380), dec!(0)),
            ],
            None,
            None,
        );

        assert_eq!(report.revenue.total, dec!(500));
        assert_eq!(report.expenses.total, dec!(120));
        assert_eq!(report.net_income, dec!(380));
        // Balance-sheet accounts never leak into the income statement.
        assert_eq!(report.revenue.rows.len(), 1);
        assert_eq!(report.expenses.rows.len(), 1);
    }

    #[test]
    fn test_running_balances() {
        let balances = ReportService::running_balances(
            AccountNature::Debit,
            dec!(10),
            &[
                (dec!(115), dec!(0)),
                (dec!(0), dec!(40)),
                (dec!(5), dec!(0)),
            ],
        );
        assert_eq!(balances, vec![dec!(125), dec!(85), dec!(90)]);
    }

    #[test]
    fn test_running_balances_credit_nature() {
        let balances = ReportService::running_balances(
            AccountNature::Credit,
            dec!(0),
            &[(dec!(0), dec!(100)), (dec!(30), dec!(0))],
        );
        assert_eq!(balances, vec![dec!(100), dec!(70)]);
    }
}
