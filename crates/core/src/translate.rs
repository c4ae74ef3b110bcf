#![allow(missing_docs)]

//! Bulgarian display labels for document status and payment-method codes.

use std::str::FromStr;

use thiserror::Error;

/// Label used for status codes we do not recognise.
pub const UNKNOWN_LABEL: &str = "Непознат";

/// Lifecycle status of an offer/contract document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    Draft,
    Issued,
    Viewed,
    Signed,
    Withdrawn,
    Expired,
}

impl DocumentStatus {
    /// Every status in lifecycle order.
    pub const ALL: [DocumentStatus; 6] = [
        DocumentStatus::Draft,
        DocumentStatus::Issued,
        DocumentStatus::Viewed,
        DocumentStatus::Signed,
        DocumentStatus::Withdrawn,
        DocumentStatus::Expired,
    ];

    /// Wire code.
    pub fn code(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Issued => "issued",
            DocumentStatus::Viewed => "viewed",
            DocumentStatus::Signed => "signed",
            DocumentStatus::Withdrawn => "withdrawn",
            DocumentStatus::Expired => "expired",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "Чернова",
            DocumentStatus::Issued => "Издаден",
            DocumentStatus::Viewed => "Прегледан",
            DocumentStatus::Signed => "Подписан",
            DocumentStatus::Withdrawn => "Оттеглен",
            DocumentStatus::Expired => "Изтекъл",
        }
    }
}

/// Accepted payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Card,
    Invoice,
    Other,
}

impl PaymentMethod {
    /// Every method in display order.
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::BankTransfer,
        PaymentMethod::Card,
        PaymentMethod::Invoice,
        PaymentMethod::Other,
    ];

    /// Wire code.
    pub fn code(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Card => "card",
            PaymentMethod::Invoice => "invoice",
            PaymentMethod::Other => "other",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "В брой",
            PaymentMethod::BankTransfer => "Банков превод",
            PaymentMethod::Card => "Кредитна карта",
            PaymentMethod::Invoice => "Фактура",
            PaymentMethod::Other => "Друго",
        }
    }
}

/// A code outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown code {0:?}")]
pub struct UnknownCode(pub String);

impl FromStr for DocumentStatus {
    type Err = UnknownCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DocumentStatus::ALL
            .into_iter()
            .find(|status| status.code() == value)
            .ok_or_else(|| UnknownCode(value.to_string()))
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.code() == value)
            .ok_or_else(|| UnknownCode(value.to_string()))
    }
}

/// Label for a status code; unknown codes map to [`UNKNOWN_LABEL`].
pub fn translate_status(code: &str) -> &'static str {
    code.parse::<DocumentStatus>()
        .map(DocumentStatus::label)
        .unwrap_or(UNKNOWN_LABEL)
}

/// Space-terminated labels for each payment code, in input order.
///
/// Unknown codes contribute nothing to the output.
pub fn translate_allowed_payment_methods<I, S>(codes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .filter_map(|code| code.as_ref().parse::<PaymentMethod>().ok())
        .fold(String::new(), |mut acc, method| {
            acc.push_str(method.label());
            acc.push(' ');
            acc
        })
}
