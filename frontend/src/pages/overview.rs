use crate::components::layout::page_shell;
use crate::components::widgets::*;
use crate::config::AppConfig;
use crate::filter::{Aggregates, FilterState, Filterable};
use crate::hooks::use_resource;
use crate::models::bid::{Bid, BidStatus};
use crate::models::contract::{Contract, ContractStatus};
use crate::models::expense::{Expense, ExpenseStatus};
use crate::models::revenue::{Revenue, RevenueStatus};
use std::collections::HashMap;
use yew::prelude::*;

/// Headline figures of the public dashboard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub collected_revenue: f64,
    pub paid_expenses: f64,
    pub balance: f64,
    pub active_contracts: usize,
    pub open_bids: usize,
    /// Paid expenses per category, largest first.
    pub expenses_by_category: Vec<(String, f64)>,
}

fn narrowed<'a, R: Filterable>(items: &'a [R], key: &'static str, value: &str) -> Vec<&'a R> {
    let mut filters = FilterState::new();
    filters.select(key, value);
    filters.apply(items)
}

impl Summary {
    pub fn compute(
        revenues: &[Revenue],
        expenses: &[Expense],
        contracts: &[Contract],
        bids: &[Bid],
    ) -> Self {
        let collected = narrowed(revenues, "status", RevenueStatus::Collected.label());
        let paid = narrowed(expenses, "status", ExpenseStatus::Paid.label());
        let collected_revenue = Aggregates::compute(&collected).sum;
        let paid_expenses = Aggregates::compute(&paid).sum;

        let mut totals: HashMap<&'static str, f64> = HashMap::new();
        for expense in &paid {
            *totals.entry(expense.category.label()).or_insert(0.0) += expense.amount;
        }
        let mut expenses_by_category: Vec<(String, f64)> = totals
            .into_iter()
            .map(|(category, amount)| (category.to_string(), amount))
            .collect();
        expenses_by_category.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            collected_revenue,
            paid_expenses,
            balance: collected_revenue - paid_expenses,
            active_contracts: narrowed(contracts, "status", ContractStatus::Active.label()).len(),
            open_bids: narrowed(bids, "status", BidStatus::Open.label()).len(),
            expenses_by_category,
        }
    }

    pub fn balance_hint(&self) -> &'static str {
        if self.balance < 0.0 {
            "Deficit: paid expenses exceed collected revenue"
        } else {
            "Surplus: collected revenue covers paid expenses"
        }
    }
}

#[function_component(OverviewPage)]
pub fn overview_page() -> Html {
    let revenues = use_resource::<Revenue>();
    let expenses = use_resource::<Expense>();
    let contracts = use_resource::<Contract>();
    let bids = use_resource::<Bid>();
    let currency_symbol = use_context::<AppConfig>()
        .map(|c| c.currency_symbol)
        .unwrap_or_else(|| AppConfig::default().currency_symbol);

    let loading = revenues.state().loading
        || expenses.state().loading
        || contracts.state().loading
        || bids.state().loading;
    let error = [
        &revenues.state().error,
        &expenses.state().error,
        &contracts.state().error,
        &bids.state().error,
    ]
    .into_iter()
    .flatten()
    .next()
    .cloned();

    let summary = Summary::compute(
        &revenues.state().items,
        &expenses.state().items,
        &contracts.state().items,
        &bids.state().items,
    );

    html! {
        { page_shell(
            "Overview",
            html! {},
            html! {
                <>
                    if let Some(message) = error {
                        <div class="bg-red-50 border border-red-200 text-red-700 text-sm px-4 py-3 rounded-[10px]">{ message }</div>
                    }

                    <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                        <StatCard title="Collected revenue" value={format_currency(summary.collected_revenue, &currency_symbol)} icon={StatIcon::UpRight} hint="Revenues marked as collected" />
                        <StatCard title="Paid expenses" value={format_currency(summary.paid_expenses, &currency_symbol)} icon={StatIcon::CreditCard} hint="Expenses marked as paid" />
                        <StatCard title="Balance" value={format_currency(summary.balance, &currency_symbol)} icon={StatIcon::Wallet} hint={summary.balance_hint()} />
                    </div>

                    <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                        <StatCard title="Active contracts" value={format_count(summary.active_contracts)} icon={StatIcon::Count} />
                        <StatCard title="Open bids" value={format_count(summary.open_bids)} icon={StatIcon::Count} />
                    </div>

                    <div>
                        <h2 class="text-lg font-bold text-foreground mb-3">{"Expense Breakdown"}</h2>
                        <div class="bg-card rounded-[10px] border border-border overflow-hidden">
                            <div class="p-6">
                                { if loading {
                                    html! { <p class="text-sm text-muted-foreground">{"Loading..."}</p> }
                                } else if summary.expenses_by_category.is_empty() {
                                    html! { <p class="text-sm text-muted-foreground">{"No paid expenses yet."}</p> }
                                } else {
                                    html! {
                                        <div class="space-y-2">
                                            { for summary.expenses_by_category.iter().map(|(category, amount)| html! {
                                                <div class="flex items-center justify-between text-sm">
                                                    <span class="text-muted-foreground">{ category.clone() }</span>
                                                    <span class="font-semibold text-foreground">{ format_currency(*amount, &currency_symbol) }</span>
                                                </div>
                                            }) }
                                        </div>
                                    }
                                }}
                            </div>
                        </div>
                    </div>
                </>
            }
        ) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bid::Modality;
    use crate::models::expense::ExpenseCategory;
    use crate::models::revenue::RevenueCategory;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn revenue(id: i64, amount: f64, status: RevenueStatus) -> Revenue {
        Revenue {
            id,
            description: "ISS".into(),
            source: "Contribuintes".into(),
            category: RevenueCategory::Tax,
            amount,
            date: day(),
            status,
        }
    }

    fn expense(id: i64, category: ExpenseCategory, amount: f64, status: ExpenseStatus) -> Expense {
        Expense {
            id,
            description: "Pagamento".into(),
            supplier: "Fornecedor".into(),
            category,
            amount,
            date: day(),
            status,
        }
    }

    fn bid(id: i64, status: BidStatus) -> Bid {
        Bid {
            id,
            number: format!("PE {id}/2024"),
            object: "Material de escritório".into(),
            modality: Modality::Auction,
            estimated_amount: 1000.0,
            opening_date: day(),
            status,
        }
    }

    #[test]
    fn only_collected_and_paid_count_towards_balance() {
        let revenues = vec![
            revenue(1, 1000.0, RevenueStatus::Collected),
            revenue(2, 500.0, RevenueStatus::Forecast),
            revenue(3, 250.0, RevenueStatus::Collected),
        ];
        let expenses = vec![
            expense(1, ExpenseCategory::Health, 400.0, ExpenseStatus::Paid),
            expense(2, ExpenseCategory::Health, 900.0, ExpenseStatus::Committed),
            expense(3, ExpenseCategory::Education, 100.0, ExpenseStatus::Paid),
        ];
        let summary = Summary::compute(&revenues, &expenses, &[], &[]);
        assert_eq!(summary.collected_revenue, 1250.0);
        assert_eq!(summary.paid_expenses, 500.0);
        assert_eq!(summary.balance, 750.0);
    }

    #[test]
    fn breakdown_is_sorted_by_amount() {
        let expenses = vec![
            expense(1, ExpenseCategory::Education, 100.0, ExpenseStatus::Paid),
            expense(2, ExpenseCategory::Health, 300.0, ExpenseStatus::Paid),
            expense(3, ExpenseCategory::Education, 50.0, ExpenseStatus::Paid),
            expense(4, ExpenseCategory::Security, 999.0, ExpenseStatus::Cancelled),
        ];
        let summary = Summary::compute(&[], &expenses, &[], &[]);
        assert_eq!(
            summary.expenses_by_category,
            vec![("Saúde".to_string(), 300.0), ("Educação".to_string(), 150.0)]
        );
    }

    #[test]
    fn counts_open_bids() {
        let bids = vec![
            bid(1, BidStatus::Open),
            bid(2, BidStatus::Finished),
            bid(3, BidStatus::Open),
        ];
        let summary = Summary::compute(&[], &[], &[], &bids);
        assert_eq!(summary.open_bids, 2);
        assert_eq!(summary.active_contracts, 0);
    }

    #[test]
    fn balance_hint_tells_deficit_from_surplus() {
        let expenses = vec![expense(1, ExpenseCategory::Health, 400.0, ExpenseStatus::Paid)];
        let deficit = Summary::compute(&[], &expenses, &[], &[]);
        assert!(deficit.balance_hint().starts_with("Deficit"));
        assert!(Summary::default().balance_hint().starts_with("Surplus"));
    }

    #[test]
    fn empty_collections_give_zeroes() {
        assert_eq!(Summary::compute(&[], &[], &[], &[]), Summary::default());
    }
}
