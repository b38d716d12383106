//! Menu labels and message text
//!
//! The state machine speaks in [`Notice`] values; this module turns them into
//! user-facing strings.

use crate::state_machine::{Notice, Vocabulary};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    English,
    Arabic,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "ar" | "arabic" => Ok(Locale::Arabic),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

impl Locale {
    pub fn vocabulary(self) -> Vocabulary {
        match self {
            Locale::English => Vocabulary {
                main_menu: "Names".to_string(),
                add_name: "Add name".to_string(),
                list_all: "All".to_string(),
                new_debt: "New debt".to_string(),
                payment: "Payment".to_string(),
                status: "Status".to_string(),
                delete: "Delete".to_string(),
                back: "Back".to_string(),
            },
            Locale::Arabic => Vocabulary {
                main_menu: "قائمة الأسماء".to_string(),
                add_name: "إضافة اسم جديد".to_string(),
                list_all: "الكل".to_string(),
                new_debt: "دين جديد".to_string(),
                payment: "سداد".to_string(),
                status: "الحالة".to_string(),
                delete: "حذف الشخص".to_string(),
                back: "رجوع".to_string(),
            },
        }
    }

    pub fn render(self, notice: &Notice) -> String {
        match self {
            Locale::English => render_english(notice),
            Locale::Arabic => render_arabic(notice),
        }
    }
}

/// Display form of an amount: trailing zeros trimmed
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

fn render_english(notice: &Notice) -> String {
    match notice {
        Notice::Welcome | Notice::ChooseFromMenu => "Choose from the menu:".to_string(),
        Notice::AskNewName => "Type the new name:".to_string(),
        Notice::InvalidName => "Please type a valid name.".to_string(),
        Notice::AskInitialAmount { name } => format!("Type the initial amount for {name}:"),
        Notice::InvalidAmount => "Invalid amount. Type a positive number.".to_string(),
        Notice::Created { name, amount } => {
            format!("Recorded a debt of {} for {name}", format_amount(*amount))
        }
        Notice::AlreadyExists { .. } => "That name already exists.".to_string(),
        Notice::ListEmpty => "The list is empty. Add a new name first.".to_string(),
        Notice::ChooseName => "Choose a name:".to_string(),
        Notice::Summary(records) => summary_lines(records, "remaining"),
        Notice::NoDebts => "No debts.".to_string(),
        Notice::Selected { name } => format!("Selected: {name}"),
        Notice::SelectFirst => "Select a name from the names list first.".to_string(),
        Notice::AskDebtAmount { name } => format!("Type the new debt amount for {name}:"),
        Notice::AskPaymentAmount { name } => format!("Type the payment amount for {name}:"),
        Notice::DebtIncreased {
            name,
            amount,
            remaining,
        } => format!(
            "Added a new debt of {} for {name}\nRemaining now: {}",
            format_amount(*amount),
            format_amount(*remaining)
        ),
        Notice::PaymentApplied { remaining } => {
            format!("Payment recorded. Remaining: {}", format_amount(*remaining))
        }
        Notice::Overpayment { remaining } => format!(
            "Cannot pay that amount. Current remaining: {}",
            format_amount(*remaining)
        ),
        Notice::Status(record) => format!(
            "{}\nTotal: {}\nPaid: {}\nRemaining: {}",
            record.name,
            format_amount(record.total),
            format_amount(record.paid),
            format_amount(record.remaining())
        ),
        Notice::Deleted { name } => format!("Removed {name} from the list."),
        Notice::NotFound { .. } => "Name not found.".to_string(),
        Notice::NotUnderstood => "Not understood. Choose one of the buttons shown.".to_string(),
        Notice::UnexpectedError => "An unexpected error occurred. Please try again.".to_string(),
    }
}

fn render_arabic(notice: &Notice) -> String {
    match notice {
        Notice::Welcome | Notice::ChooseFromMenu => "اختر من القائمة:".to_string(),
        Notice::AskNewName => "اكتب الاسم الجديد:".to_string(),
        Notice::InvalidName => "اكتب اسم صحيح.".to_string(),
        Notice::AskInitialAmount { name } => format!("اكتب المبلغ الأولي لـ {name}:"),
        Notice::InvalidAmount => "المبلغ غير صحيح. اكتب رقم موجب.".to_string(),
        Notice::Created { name, amount } => {
            format!("تم تسجيل دين {name} بمبلغ {}", format_amount(*amount))
        }
        Notice::AlreadyExists { .. } => "الاسم موجود مسبقاً.".to_string(),
        Notice::ListEmpty => "القائمة فارغة. أضف اسم جديد أولاً.".to_string(),
        Notice::ChooseName => "اختر الاسم:".to_string(),
        Notice::Summary(records) => summary_lines(records, "المتبقي"),
        Notice::NoDebts => "لا توجد ديون.".to_string(),
        Notice::Selected { name } => format!("تم اختيار: {name}"),
        Notice::SelectFirst => "اختر اسم أولاً من قائمة الأسماء.".to_string(),
        Notice::AskDebtAmount { name } => format!("اكتب مبلغ الدين الجديد لـ {name}:"),
        Notice::AskPaymentAmount { name } => format!("اكتب مبلغ السداد لـ {name}:"),
        Notice::DebtIncreased {
            name,
            amount,
            remaining,
        } => format!(
            "تمت إضافة دين جديد لـ {name} بمبلغ {}\nالمتبقي الآن: {}",
            format_amount(*amount),
            format_amount(*remaining)
        ),
        Notice::PaymentApplied { remaining } => {
            format!("تم السداد. المتبقي: {}", format_amount(*remaining))
        }
        Notice::Overpayment { remaining } => format!(
            "لا يمكن السداد بهذا المبلغ. المتبقي الحالي: {}",
            format_amount(*remaining)
        ),
        Notice::Status(record) => format!(
            "{}\nإجمالي: {}\nمدفوع: {}\nمتبقي: {}",
            record.name,
            format_amount(record.total),
            format_amount(record.paid),
            format_amount(record.remaining())
        ),
        Notice::Deleted { name } => format!("تم حذف {name} من القائمة."),
        Notice::NotFound { .. } => "الاسم غير موجود.".to_string(),
        Notice::NotUnderstood => "غير مفهوم. اختر من الأزرار المعروضة.".to_string(),
        Notice::UnexpectedError => "حدث خطأ غير متوقع. حاول مرة ثانية.".to_string(),
    }
}

fn summary_lines(records: &[crate::db::DebtorRecord], remaining_label: &str) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{} - {remaining_label}: {}",
            record.name,
            format_amount(record.remaining())
        );
    }
    out
}
