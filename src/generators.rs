//! Registry of named random-value generators.
//!
//! The registry is built once on first use and never mutated. Names follow
//! the provider method names policies already use (`email`, `ssn`,
//! `date_between`, `pyint`, ...). Most entries are backed by the `fake`
//! crate; the rest are small formatters over the random source. Policies
//! refer to generators through [`GeneratorKind`], which can only be
//! constructed for a registered name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, Days, Months, NaiveDate, TimeDelta, Utc};
use fake::faker::address::en::{
    BuildingNumber, CityName, CountryCode, CountryName, PostCode, SecondaryAddress, StateAbbr,
    StateName, StreetName, StreetSuffix, ZipCode,
};
use fake::faker::company::en::{
    Bs, Buzzword, CatchPhrase, CompanyName, CompanySuffix, Industry, Profession,
};
use fake::faker::creditcard::en::CreditCardNumber;
use fake::faker::currency::en::{CurrencyCode, CurrencyName, CurrencySymbol};
use fake::faker::internet::en::{
    DomainSuffix, FreeEmail, FreeEmailProvider, IPv4, IPv6, MACAddress, Password, SafeEmail,
    UserAgent, Username,
};
use fake::faker::job::en::Title as JobTitle;
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name, Suffix, Title};
use fake::faker::phone_number::en::{CellNumber, PhoneNumber};
use fake::{Dummy, Fake};
use rand::distr::Alphabetic;
use rand::{Rng, RngCore};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use thiserror::Error;

use crate::sql::SqlValue;

/// Function producing one value from a random source.
pub type GeneratorFn = fn(&mut dyn RngCore) -> SqlValue;

static GENERATORS: &[(&str, GeneratorFn)] = &[
    // person
    ("name", |rng| text(rng, Name())),
    ("first_name", |rng| text(rng, FirstName())),
    ("last_name", |rng| text(rng, LastName())),
    ("prefix", |rng| text(rng, Title())),
    ("suffix", |rng| text(rng, Suffix())),
    ("ssn", ssn),
    ("job", |rng| text(rng, JobTitle())),
    // contact
    ("email", |rng| text(rng, FreeEmail())),
    ("free_email", |rng| text(rng, FreeEmail())),
    ("safe_email", |rng| text(rng, SafeEmail())),
    ("company_email", company_email),
    ("free_email_domain", |rng| text(rng, FreeEmailProvider())),
    ("user_name", |rng| text(rng, Username())),
    ("password", |rng| text(rng, Password(10..11))),
    ("phone_number", |rng| text(rng, PhoneNumber())),
    ("cellphone_number", |rng| text(rng, CellNumber())),
    ("msisdn", msisdn),
    // address
    ("address", address),
    ("street_address", street_address),
    ("street_name", |rng| text(rng, StreetName())),
    ("street_suffix", |rng| text(rng, StreetSuffix())),
    ("building_number", |rng| text(rng, BuildingNumber())),
    ("secondary_address", |rng| text(rng, SecondaryAddress())),
    ("city", |rng| text(rng, CityName())),
    ("state", |rng| text(rng, StateName())),
    ("state_abbr", |rng| text(rng, StateAbbr())),
    ("postcode", |rng| text(rng, PostCode())),
    ("zipcode", |rng| text(rng, ZipCode())),
    ("country", |rng| text(rng, CountryName())),
    ("country_code", |rng| text(rng, CountryCode())),
    ("latitude", latitude),
    ("longitude", longitude),
    // company
    ("company", |rng| text(rng, CompanyName())),
    ("company_suffix", |rng| text(rng, CompanySuffix())),
    ("catch_phrase", |rng| text(rng, CatchPhrase())),
    ("bs", |rng| text(rng, Bs())),
    ("buzzword", |rng| text(rng, Buzzword())),
    ("industry", |rng| text(rng, Industry())),
    ("profession", |rng| text(rng, Profession())),
    // finance
    ("credit_card_number", |rng| text(rng, CreditCardNumber())),
    ("credit_card_security_code", credit_card_security_code),
    ("iban", iban),
    ("bban", bban),
    ("currency_code", |rng| text(rng, CurrencyCode())),
    ("currency_name", |rng| text(rng, CurrencyName())),
    ("currency_symbol", |rng| text(rng, CurrencySymbol())),
    // internet
    ("ipv4", |rng| text(rng, IPv4())),
    ("ipv6", |rng| text(rng, IPv6())),
    ("mac_address", |rng| text(rng, MACAddress())),
    ("user_agent", |rng| text(rng, UserAgent())),
    ("domain_name", domain_name),
    ("url", url),
    ("tld", |rng| text(rng, DomainSuffix())),
    // text
    ("word", |rng| text(rng, Word())),
    ("words", words),
    ("sentence", |rng| text(rng, Sentence(4..10))),
    ("paragraph", |rng| text(rng, Paragraph(3..6))),
    ("text", |rng| text(rng, Paragraph(2..5))),
    // dates
    ("date", date_between),
    ("date_between", date_between),
    ("date_object", date_between),
    ("past_date", past_date),
    ("future_date", future_date),
    ("date_of_birth", date_of_birth),
    ("date_time", date_time_between),
    ("date_time_between", date_time_between),
    ("year", year),
    // primitives
    ("boolean", boolean),
    ("pybool", boolean),
    ("pyint", random_int),
    ("random_int", random_int),
    ("random_digit", random_digit),
    ("random_number", random_number),
    ("pyfloat", pyfloat),
    ("pystr", pystr),
    ("uuid4", uuid4),
];

static REGISTRY: LazyLock<BTreeMap<&'static str, GeneratorFn>> =
    LazyLock::new(|| GENERATORS.iter().copied().collect());

/// Names of every registered generator, sorted.
pub fn generator_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.keys().copied()
}

/// Raised when a policy names a generator that is not registered.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown generator '{name}'")]
pub struct UnknownGenerator {
    /// Name that failed to resolve.
    pub name: String,
}

/// Validated handle to a registered generator.
#[derive(Clone, Copy)]
pub struct GeneratorKind {
    name: &'static str,
    generate: GeneratorFn,
}

impl GeneratorKind {
    /// Resolves a generator by name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownGenerator`] when no generator has that name.
    pub fn parse(name: &str) -> Result<Self, UnknownGenerator> {
        REGISTRY
            .get_key_value(name)
            .map(|(key, generate)| Self {
                name: key,
                generate: *generate,
            })
            .ok_or_else(|| UnknownGenerator {
                name: name.to_owned(),
            })
    }

    /// Registered name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Draws a fresh value.
    pub fn generate(&self, rng: &mut dyn RngCore) -> SqlValue {
        (self.generate)(rng)
    }
}

impl<'de> Deserialize<'de> for GeneratorKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name).map_err(de::Error::custom)
    }
}

impl PartialEq for GeneratorKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for GeneratorKind {}

impl fmt::Debug for GeneratorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("GeneratorKind").field(&self.name).finish()
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name)
    }
}

/// Oldest age drawn by `date_of_birth`, in years.
const MAX_AGE_YEARS: u32 = 115;

/// Span covered by `date_between` and `date_time_between`, in years.
const HISTORY_YEARS: u32 = 30;

const PYSTR_LENGTH: usize = 20;

fn fake_string<F>(rng: &mut dyn RngCore, faker: F) -> String
where
    String: Dummy<F>,
{
    let mut source = rng;
    faker.fake_with_rng(&mut source)
}

fn text<F>(rng: &mut dyn RngCore, faker: F) -> SqlValue
where
    String: Dummy<F>,
{
    SqlValue::Text(fake_string(rng, faker))
}

fn digits(rng: &mut dyn RngCore, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0'.saturating_add(rng.random_range(0..10_u8))))
        .collect()
}

fn ssn(rng: &mut dyn RngCore) -> SqlValue {
    let area = loop {
        let candidate = rng.random_range(1..900_u32);
        if candidate != 666 {
            break candidate;
        }
    };
    SqlValue::Text(format!(
        "{area:03}-{:02}-{:04}",
        rng.random_range(1..100_u32),
        rng.random_range(1..10_000_u32)
    ))
}

fn msisdn(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Text(digits(rng, 13))
}

fn company_email(rng: &mut dyn RngCore) -> SqlValue {
    let user = fake_string(rng, Username());
    let company = fake_string(rng, LastName()).to_lowercase();
    let suffix = fake_string(rng, DomainSuffix());
    SqlValue::Text(format!("{user}@{company}.{suffix}"))
}

fn street_line(rng: &mut dyn RngCore) -> String {
    format!(
        "{} {}",
        fake_string(rng, BuildingNumber()),
        fake_string(rng, StreetName())
    )
}

fn street_address(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Text(street_line(rng))
}

fn address(rng: &mut dyn RngCore) -> SqlValue {
    let street = street_line(rng);
    let city = fake_string(rng, CityName());
    let state = fake_string(rng, StateAbbr());
    let zip = fake_string(rng, ZipCode());
    SqlValue::Text(format!("{street}\n{city}, {state} {zip}"))
}

fn latitude(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Text(format!("{:.6}", rng.random_range(-90.0_f64..=90.0)))
}

fn longitude(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Text(format!("{:.6}", rng.random_range(-180.0_f64..=180.0)))
}

fn credit_card_security_code(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Text(digits(rng, 3))
}

fn bban_text(rng: &mut dyn RngCore) -> String {
    let bank: String = (0..4)
        .map(|_| char::from(b'A'.saturating_add(rng.random_range(0..26_u8))))
        .collect();
    format!("{bank}{}", digits(rng, 14))
}

fn bban(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Text(bban_text(rng))
}

/// ISO 13616 check digits for `country` and `bban`.
fn iban_check_digits(country: &str, bban: &str) -> u32 {
    let remainder = bban
        .chars()
        .chain(country.chars())
        .chain("00".chars())
        .filter_map(|ch| ch.to_digit(36))
        .fold(0_u32, |acc, value| {
            let shifted = if value >= 10 { acc * 100 } else { acc * 10 };
            (shifted + value).rem_euclid(97)
        });
    98 - remainder
}

fn iban(rng: &mut dyn RngCore) -> SqlValue {
    let account = bban_text(rng);
    let check = iban_check_digits("GB", &account);
    SqlValue::Text(format!("GB{check:02}{account}"))
}

fn domain_name(rng: &mut dyn RngCore) -> SqlValue {
    let host = fake_string(rng, Word()).to_lowercase();
    let suffix = fake_string(rng, DomainSuffix());
    SqlValue::Text(format!("{host}.{suffix}"))
}

fn url(rng: &mut dyn RngCore) -> SqlValue {
    let host = fake_string(rng, Word()).to_lowercase();
    let suffix = fake_string(rng, DomainSuffix());
    SqlValue::Text(format!("https://www.{host}.{suffix}/"))
}

fn words(rng: &mut dyn RngCore) -> SqlValue {
    let mut source = rng;
    let picked: Vec<String> = Words(3..4).fake_with_rng(&mut source);
    SqlValue::Text(picked.join(" "))
}

fn days_back(rng: &mut dyn RngCore, from: NaiveDate, earliest: NaiveDate) -> NaiveDate {
    let span = u64::try_from(from.signed_duration_since(earliest).num_days()).unwrap_or(0);
    from.checked_sub_days(Days::new(rng.random_range(0..=span)))
        .unwrap_or(from)
}

fn date_between(rng: &mut dyn RngCore) -> SqlValue {
    let today = Utc::now().date_naive();
    let earliest = today
        .checked_sub_months(Months::new(HISTORY_YEARS * 12))
        .unwrap_or(today);
    SqlValue::Date(days_back(rng, today, earliest))
}

fn past_date(rng: &mut dyn RngCore) -> SqlValue {
    let today = Utc::now().date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let earliest = today.checked_sub_days(Days::new(30)).unwrap_or(today);
    SqlValue::Date(days_back(rng, yesterday, earliest))
}

fn future_date(rng: &mut dyn RngCore) -> SqlValue {
    let today = Utc::now().date_naive();
    let ahead = rng.random_range(1..=30_u64);
    SqlValue::Date(today.checked_add_days(Days::new(ahead)).unwrap_or(today))
}

fn date_of_birth(rng: &mut dyn RngCore) -> SqlValue {
    let today = Utc::now().date_naive();
    let earliest = today
        .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
        .unwrap_or(today);
    SqlValue::Date(days_back(rng, today, earliest))
}

fn date_time_between(rng: &mut dyn RngCore) -> SqlValue {
    let now = Utc::now();
    let earliest = now
        .checked_sub_months(Months::new(HISTORY_YEARS * 12))
        .unwrap_or(now);
    let span = now.signed_duration_since(earliest).num_seconds().max(0);
    let offset = TimeDelta::seconds(rng.random_range(0..=span));
    SqlValue::Timestamp(now.checked_sub_signed(offset).unwrap_or(now))
}

fn year(rng: &mut dyn RngCore) -> SqlValue {
    let latest = Utc::now().year().max(1970);
    SqlValue::Text(rng.random_range(1970..=latest).to_string())
}

fn boolean(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Bool(rng.random())
}

fn random_int(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Int(rng.random_range(0..=9999))
}

fn random_digit(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Int(rng.random_range(0..=9))
}

fn random_number(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Int(rng.random_range(0..1_000_000_000))
}

fn pyfloat(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Float(rng.random_range(-1_000_000.0..1_000_000.0))
}

fn pystr(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Text(
        (0..PYSTR_LENGTH)
            .map(|_| char::from(rng.sample(Alphabetic)))
            .collect(),
    )
}

fn uuid4(rng: &mut dyn RngCore) -> SqlValue {
    SqlValue::Uuid(uuid::Builder::from_random_bytes(rng.random()).into_uuid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;
    use serde::de::DeserializeOwned;

    fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
        serde_json::from_reader(raw.as_bytes())
    }

    #[test]
    fn every_catalogued_name_resolves_and_generates() {
        let mut rng = StdRng::seed_from_u64(5);
        for generator in generator_names() {
            let kind = GeneratorKind::parse(generator)
                .unwrap_or_else(|err| panic!("{generator} should resolve: {err}"));
            assert_eq!(kind.name(), generator);
            assert_ne!(kind.generate(&mut rng), SqlValue::Null, "{generator}");
        }
    }

    #[rstest]
    #[case("ssn")]
    #[case("iban")]
    #[case("credit_card_number")]
    #[case("free_email")]
    #[case("date_between")]
    #[case("pyint")]
    #[case("catch_phrase")]
    #[case("user_agent")]
    fn common_provider_names_are_registered(#[case] generator: &str) {
        assert!(GeneratorKind::parse(generator).is_ok(), "{generator}");
    }

    #[test]
    fn unknown_names_fail() {
        let err = GeneratorKind::parse("national_insurance_number").expect_err("unknown");
        assert_eq!(err.name, "national_insurance_number");
    }

    #[test]
    fn deserializes_from_owned_input() {
        let kind: GeneratorKind =
            decode("\"email\"").unwrap_or_else(|err| panic!("email should deserialize: {err}"));
        assert_eq!(kind.to_string(), "email");

        let err = decode::<GeneratorKind>("\"nope\"").expect_err("unknown name");
        assert!(err.to_string().contains("unknown generator 'nope'"), "{err}");
    }

    #[rstest]
    #[case("email")]
    #[case("free_email")]
    #[case("safe_email")]
    #[case("company_email")]
    fn emails_contain_an_at_sign(#[case] generator: &str) {
        let mut rng = StdRng::seed_from_u64(7);
        let kind = GeneratorKind::parse(generator).unwrap_or_else(|err| panic!("{err}"));
        match kind.generate(&mut rng) {
            SqlValue::Text(value) => assert!(value.contains('@'), "bad email {value}"),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[rstest]
    #[case("uuid4")]
    #[case("date_of_birth")]
    #[case("date_between")]
    #[case("date_time")]
    #[case("pyint")]
    #[case("pyfloat")]
    #[case("boolean")]
    fn typed_generators_return_typed_values(#[case] generator: &str) {
        let mut rng = StdRng::seed_from_u64(11);
        let kind = GeneratorKind::parse(generator).unwrap_or_else(|err| panic!("{err}"));
        let value = kind.generate(&mut rng);
        assert!(
            !matches!(value, SqlValue::Text(_) | SqlValue::Null),
            "{generator} produced {value:?}"
        );
    }

    #[test]
    fn ssn_avoids_reserved_areas() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            let SqlValue::Text(value) = ssn(&mut rng) else {
                panic!("ssn should be text");
            };
            let area = value.split('-').next().unwrap_or_default();
            assert_eq!(value.len(), 11, "{value}");
            assert_ne!(area, "000");
            assert_ne!(area, "666");
            assert!(!area.starts_with('9'), "{value}");
        }
    }

    #[test]
    fn iban_check_digits_match_the_published_example() {
        assert_eq!(iban_check_digits("GB", "WEST12345698765432"), 82);
    }

    #[test]
    fn consecutive_draws_are_independent() {
        let mut rng = StdRng::seed_from_u64(3);
        let kind = GeneratorKind::parse("uuid4").unwrap_or_else(|err| panic!("{err}"));
        assert_ne!(kind.generate(&mut rng), kind.generate(&mut rng));
    }
}
