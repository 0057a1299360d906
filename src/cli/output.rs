use std::fmt;

use colored::{ColoredString, Colorize};

use crate::{
    config::Theme,
    domain::{Displayable, Semester, Statistics, Transaction},
};

const SEPARATOR: &str = "----------------------------------------";
const SHARE_BAR_WIDTH: usize = 20;

/// Themed console writer. The theme is fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    theme: Theme,
}

impl Output {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    fn accent(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Light => text.blue().bold(),
            Theme::Dark => text.purple().bold(),
        }
    }

    fn signed(&self, value: f64) -> ColoredString {
        let text = format!("{value:.2}");
        if value < 0.0 {
            text.red()
        } else {
            text.green()
        }
    }

    pub fn info(&self, message: impl fmt::Display) {
        println!("{} {message}", self.accent("[i]"));
    }

    pub fn success(&self, message: impl fmt::Display) {
        println!("{} {message}", "[ok]".green().bold());
    }

    pub fn warning(&self, message: impl fmt::Display) {
        println!("{} {message}", "[!]".yellow().bold());
    }

    pub fn error(&self, message: impl fmt::Display) {
        eprintln!("{} {message}", "[x]".red().bold());
    }

    pub fn section(&self, title: impl fmt::Display) {
        println!("{}", self.accent(&format!("=== {} ===", title.to_string().trim())));
    }

    pub fn separator(&self) {
        println!("{SEPARATOR}");
    }

    pub fn semesters(&self, semesters: &[Semester], selected: Option<&Semester>) {
        self.section("Semesters");
        if semesters.is_empty() {
            self.info("No Semesters Available");
            return;
        }
        for semester in semesters {
            let marker = if selected.map(|current| &current.id) == Some(&semester.id) {
                "*"
            } else {
                " "
            };
            println!("{marker} {:<12} {}", semester.id, semester.display_label());
        }
    }

    pub fn transactions<'a>(&self, transactions: impl IntoIterator<Item = &'a Transaction>) {
        let mut count = 0;
        for txn in transactions {
            println!("  {:<10} {}", txn.id, txn.display_label());
            count += 1;
        }
        if count == 0 {
            self.info("No transactions.");
        }
    }

    pub fn statistics(&self, semester: &Semester, stats: &Statistics) {
        self.section(format!("Statistics: {}", semester.name));
        println!("  Starting capital   {:>12.2}", stats.starting_capital);
        println!("  Current capital    {:>12.2}", stats.current_capital);
        println!("  Surplus            {:>12}", self.signed(stats.surplus));
        println!("  Active house size  {:>12}", stats.active_house_size);
        println!("  Insurance          {:>12.2}", stats.insurance_cost);
        self.separator();
        println!("  Income             {:>12}", self.signed(stats.total_income));
        println!("  Expenses           {:>12}", self.signed(stats.total_expenses));
        println!("  Net                {:>12}", self.signed(stats.net));
        println!("  Transactions       {:>12}", stats.transaction_count);
        self.separator();
        for entry in &stats.per_category {
            let filled = (entry.share * SHARE_BAR_WIDTH as f64).round() as usize;
            let bar = format!(
                "{}{}",
                "#".repeat(filled.min(SHARE_BAR_WIDTH)),
                ".".repeat(SHARE_BAR_WIDTH - filled.min(SHARE_BAR_WIDTH))
            );
            println!(
                "  {:<18} {:>12} {} {:>5.1}%",
                entry.category,
                self.signed(entry.total),
                self.accent(&bar),
                entry.share * 100.0
            );
        }
    }

    pub fn categories<'a>(&self, names: impl IntoIterator<Item = &'a str>) {
        self.section("Categories");
        for name in names {
            println!("  - {name}");
        }
    }
}
