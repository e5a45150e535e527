//! Field validators for registration data.
//!
//! Every function here is pure and total: malformed or empty input yields
//! `false`, never an error or a panic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ALLOWED_EMAIL_DOMAINS, MIN_PASSWORD_LENGTH, PASSWORD_SYMBOLS};

const CPF_LENGTH: usize = 11;
const CNPJ_LENGTH: usize = 14;

/// Sequential CPF that passes the checksum but is never issued.
const CPF_SEQUENCE: &str = "01234567890";

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static EMAIL_DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)@({})\.", ALLOWED_EMAIL_DOMAINS.join("|")))
        .expect("valid email domain regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+[0-9]{1,3})?\s?(\([0-9]{2,3}\)\s?)?[0-9]{4,5}[-\s]?[0-9]{4}$")
        .expect("valid phone regex")
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12][0-9]|3[01])/(19|20)[0-9]{2}$")
        .expect("valid date regex")
});

static CEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{5}-?[0-9]{3}$").expect("valid CEP regex"));

/// Validate a CPF (individual taxpayer id), formatted or bare.
pub fn is_valid_cpf(input: &str) -> bool {
    let cleaned = normalize_cpf(input);
    if cleaned.len() != CPF_LENGTH || cleaned == CPF_SEQUENCE {
        return false;
    }

    let digits = to_digits(&cleaned);
    if is_repeated(&digits) {
        return false;
    }

    let first = check_digit(&digits[..9], (2..=10).rev());
    let second = check_digit(&digits[..10], (2..=11).rev());

    digits[9] == first && digits[10] == second
}

/// Canonical stored form of a CPF: its digits only.
pub fn normalize_cpf(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Validate a CNPJ (corporate taxpayer id), formatted or bare.
pub fn is_valid_cnpj(input: &str) -> bool {
    let cleaned: String = input.chars().filter(char::is_ascii_digit).collect();
    if cleaned.len() != CNPJ_LENGTH {
        return false;
    }

    let digits = to_digits(&cleaned);
    if is_repeated(&digits) {
        return false;
    }

    let first = check_digit(&digits[..12], CNPJ_FIRST_WEIGHTS);
    let second = check_digit(&digits[..13], CNPJ_SECOND_WEIGHTS);

    digits[12] == first && digits[13] == second
}

/// Validate an email address against the general `local@domain.tld` shape
/// and the allow-listed provider domains.
pub fn is_valid_email(input: &str) -> bool {
    EMAIL_RE.is_match(input) && EMAIL_DOMAIN_RE.is_match(input)
}

/// Validate password strength.
///
/// At least eight characters from `[A-Za-z0-9@$!%*?&]`, with at least one
/// lowercase letter, uppercase letter, digit and symbol.
pub fn is_valid_password(input: &str) -> bool {
    let is_symbol = |c: char| PASSWORD_SYMBOLS.contains(c);

    input.len() >= MIN_PASSWORD_LENGTH
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || is_symbol(c))
        && input.chars().any(|c| c.is_ascii_lowercase())
        && input.chars().any(|c| c.is_ascii_uppercase())
        && input.chars().any(|c| c.is_ascii_digit())
        && input.chars().any(is_symbol)
}

pub fn is_valid_phone_number(input: &str) -> bool {
    PHONE_RE.is_match(input)
}

/// Validate a `MM/DD/YYYY` date. Ranges only; day 31 is accepted in every month.
pub fn is_valid_date(input: &str) -> bool {
    if !DATE_RE.is_match(input) {
        return false;
    }

    let mut parts = input.split('/').map(|p| p.parse::<u32>().ok());
    let (Some(Some(month)), Some(Some(day)), Some(Some(year))) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    (1000..=9999).contains(&year) && (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Validate a Brazilian postal code (`NNNNN-NNN` or `NNNNNNNN`).
pub fn is_valid_cep(input: &str) -> bool {
    CEP_RE.is_match(input)
}

fn to_digits(cleaned: &str) -> Vec<u32> {
    cleaned.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn is_repeated(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

/// Weighted sum mod 11: remainders below 2 map to 0, otherwise `11 - r`.
fn check_digit(digits: &[u32], weights: impl IntoIterator<Item = u32>) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}
