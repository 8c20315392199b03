//! Currency codes and the bundled display names.

/// The domestic currency. Every rate is expressed in it.
pub const DOMESTIC: &str = "RUB";

/// Russian display names, sorted by code. Advisory only: a code missing here
/// is still valid when the snapshot has a rate for it.
const FULL_NAMES: &[(&str, &str)] = &[
    ("AED", "Дирхам ОАЭ"),
    ("AMD", "Армянский драм"),
    ("AUD", "Австралийский доллар"),
    ("AZN", "Азербайджанский манат"),
    ("BDT", "Бангладешская така"),
    ("BGN", "Болгарский лев"),
    ("BHD", "Бахрейнский динар"),
    ("BOB", "Боливиано (Боливия)"),
    ("BRL", "Бразильский реал"),
    ("BYN", "Белорусский рубль"),
    ("CAD", "Канадский доллар"),
    ("CHF", "Швейцарский франк"),
    ("CNY", "Китайский юань"),
    ("CUP", "Кубинское песо"),
    ("CZK", "Чешская крона"),
    ("DKK", "Датская крона"),
    ("DZD", "Алжирский динар"),
    ("EGP", "Египетский фунт"),
    ("ETB", "Эфиопский быр"),
    ("EUR", "Евро"),
    ("GBP", "Фунт стерлингов"),
    ("GEL", "Грузинский лари"),
    ("HKD", "Гонконгский доллар"),
    ("HUF", "Венгерский форинт"),
    ("IDR", "Индонезийская рупия"),
    ("INR", "Индийская рупия"),
    ("IRR", "Иранский риал"),
    ("JPY", "Японская иена"),
    ("KGS", "Киргизский сом"),
    ("KRW", "Южнокорейская вона"),
    ("KZT", "Казахстанский тенге"),
    ("MDL", "Молдавский лей"),
    ("MMK", "Мьянманский кьят"),
    ("MNT", "Монгольский тугрик"),
    ("NGN", "Нигерийская найра"),
    ("NOK", "Норвежская крона"),
    ("NZD", "Новозеландский доллар"),
    ("OMR", "Оманский риал"),
    ("PLN", "Польский злотый"),
    ("QAR", "Катарский риал"),
    ("RON", "Румынский лей"),
    ("RSD", "Сербский динар"),
    ("RUB", "Российский рубль"),
    ("SAR", "Саудовский риял"),
    ("SEK", "Шведская крона"),
    ("SGD", "Сингапурский доллар"),
    ("THB", "Тайский бат"),
    ("TJS", "Таджикский сомони"),
    ("TMT", "Туркменский манат"),
    ("TRY", "Турецкая лира"),
    ("UAH", "Украинская гривна"),
    ("USD", "Доллар США"),
    ("UZS", "Узбекский сум"),
    ("VND", "Вьетнамский донг"),
    ("XDR", "СДР (специальные права заимствования)"),
    ("ZAR", "Южноафриканский рэнд"),
];

pub fn full_name(code: &str) -> Option<&'static str> {
    FULL_NAMES
        .binary_search_by(|(candidate, _)| (*candidate).cmp(code))
        .ok()
        .map(|index| FULL_NAMES[index].1)
}

/// `USD (Доллар США)`, or the bare code when no name is bundled.
pub fn display_code(code: &str) -> String {
    match full_name(code) {
        Some(name) => format!("{code} ({name})"),
        None => code.to_string(),
    }
}

/// Reduces user input such as `" usd (Доллар США)"` to `USD`.
pub fn normalize_code(input: &str) -> String {
    input
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

/// Feed codes are exactly three ASCII uppercase letters.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_sorted() {
        assert!(FULL_NAMES.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_display_code() {
        assert_eq!(display_code("USD"), "USD (Доллар США)");
        assert_eq!(display_code("XYZ"), "XYZ");
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" usd (Доллар США)"), "USD");
        assert_eq!(normalize_code("eur"), "EUR");
        assert_eq!(normalize_code("   "), "");
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("CNY"));
        assert!(!is_valid_code("cny"));
        assert!(!is_valid_code("US"));
        assert!(!is_valid_code("ДОЛ"));
    }
}
