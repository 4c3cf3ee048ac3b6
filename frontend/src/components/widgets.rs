use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
pub enum StatIcon {
    Count,
    Money,
    Average,
    UpRight,
    CreditCard,
    Wallet,
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: AttrValue,
    pub value: AttrValue,
    pub icon: StatIcon,
    #[prop_or_default]
    pub hint: Option<AttrValue>,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ props.title.clone() }</p>
                <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ props.value.clone() }</h3>
                if let Some(hint) = &props.hint {
                    <p class="text-xs text-muted-foreground mt-2">{ hint.clone() }</p>
                }
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::Count => icon_list(),
                        StatIcon::Money => icon_wallet(),
                        StatIcon::Average => icon_bar_chart(),
                        StatIcon::UpRight => icon_arrow_up_right(),
                        StatIcon::CreditCard => icon_credit_card(),
                        StatIcon::Wallet => icon_wallet(),
                    }
                }
            </div>
        </div>
    }
}

fn format_with_commas(value: i64) -> String {
    let is_negative = value < 0;
    let s = value.abs().to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    let formatted: String = out.into_iter().rev().collect();
    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

pub fn format_currency(amount: f64, symbol: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as i64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}{} {}.{:02}",
        sign,
        symbol,
        format_with_commas(cents / 100),
        cents % 100
    )
}

pub fn format_count(count: usize) -> String {
    format_with_commas(count as i64)
}

pub fn badge(label: &str) -> Html {
    html! {
        <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">{ label.to_string() }</span>
    }
}

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="text-foreground">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_layout_grid() -> Html {
    icon_base("M3 3h8v8H3zM13 3h8v8h-8zM3 13h8v8H3zM13 13h8v8h-8z")
}
pub fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
pub fn icon_trending_up() -> Html {
    icon_base("M3 17l6-6 4 4 7-7")
}
pub fn icon_credit_card() -> Html {
    icon_base("M3 7h18v10H3zM3 11h18")
}
pub fn icon_file_text() -> Html {
    icon_base("M14 2H6a2 2 0 00-2 2v16a2 2 0 002 2h12a2 2 0 002-2V8zM14 2v6h6M8 13h8M8 17h8")
}
pub fn icon_gavel() -> Html {
    icon_base("M14 13l-8.5 8.5a2.1 2.1 0 01-3-3L11 10M16 16l6-6M8 8l6-6M9 7l8 8")
}
pub fn icon_inbox() -> Html {
    icon_base("M22 12h-6l-2 3h-4l-2-3H2M5.5 5h13L22 12v6a2 2 0 01-2 2H4a2 2 0 01-2-2v-6z")
}
pub fn icon_users() -> Html {
    icon_base("M17 21v-2a4 4 0 00-4-4H5a4 4 0 00-4 4v2M9 11a4 4 0 100-8 4 4 0 000 8zM23 21v-2a4 4 0 00-3-3.9M16 3.1a4 4 0 010 7.8")
}
pub fn icon_shield() -> Html {
    icon_base("M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z")
}
pub fn icon_bar_chart() -> Html {
    icon_base("M4 20V10M10 20V4M16 20v-6M22 20H2")
}
pub fn icon_list() -> Html {
    icon_base("M8 6h13M8 12h13M8 18h13M3 6h.01M3 12h.01M3 18h.01")
}
pub fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9")
}
pub fn icon_log_in() -> Html {
    icon_base("M15 3h4a2 2 0 012 2v14a2 2 0 01-2 2h-4M10 17l5-5-5-5M15 12H3")
}
pub fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
pub fn icon_arrow_up_right() -> Html {
    icon_base("M7 17L17 7M7 7h10v10")
}
