//! PIX "copia e cola" payload in the EMV QR format published by the Banco
//! Central do Brasil: a flat sequence of id(2) + length(2) + value fields,
//! closed by a CRC16 of everything up to and including the "6304" tag.

const MAX_MERCHANT_NAME: usize = 25;
const MAX_MERCHANT_CITY: usize = 15;
const MAX_TXID: usize = 25;

/// One EMV field: two-digit id, two-digit value length, value.
fn emv(id: &str, value: &str) -> String {
    format!("{id}{:02}{value}", value.len())
}

/// Merchant name and city must be plain ASCII; fold the accents Portuguese
/// names actually carry and drop anything else non-ASCII.
fn fold_accents(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => Some('a'),
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => Some('A'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'É' | 'È' | 'Ê' | 'Ë' => Some('E'),
            'í' | 'ì' | 'î' | 'ï' => Some('i'),
            'Í' | 'Ì' | 'Î' | 'Ï' => Some('I'),
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => Some('o'),
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => Some('O'),
            'ú' | 'ù' | 'û' | 'ü' => Some('u'),
            'Ú' | 'Ù' | 'Û' | 'Ü' => Some('U'),
            'ç' => Some('c'),
            'Ç' => Some('C'),
            c if c.is_ascii() => Some(c),
            _ => None,
        })
        .collect()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// CRC16-CCITT (poly 0x1021, init 0xFFFF), hex upper-case, as the EMV spec
/// requires for field 63.
fn crc16(payload: &str) -> String {
    let mut crc: u16 = 0xFFFF;
    for byte in payload.bytes() {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    format!("{crc:04X}")
}

/// Static payload for a given key, recipient and amount. Deterministic: the
/// caller supplies the transaction id.
pub fn payload(key: &str, recipient_name: &str, city: &str, amount: f64, txid: &str) -> String {
    let merchant_name = fold_accents(recipient_name).to_uppercase();
    let merchant_name = truncate(&merchant_name, MAX_MERCHANT_NAME);
    let merchant_city = fold_accents(city).to_uppercase();
    let merchant_city = truncate(&merchant_city, MAX_MERCHANT_CITY);
    let txid = truncate(txid, MAX_TXID);
    let amount = format!("{amount:.2}");

    let merchant_account = emv("26", &(emv("00", "BR.GOV.BCB.PIX") + &emv("01", key)));
    let additional_data = emv("62", &emv("05", txid));

    let body = [
        emv("00", "01"),          // payload format indicator
        merchant_account,         // merchant account information
        emv("52", "0000"),        // merchant category code
        emv("53", "986"),         // transaction currency, BRL
        emv("54", &amount),       // transaction amount
        emv("58", "BR"),          // country code
        emv("59", merchant_name), // merchant name
        emv("60", merchant_city), // merchant city
        additional_data,
        "6304".to_string(), // CRC tag, value appended below
    ]
    .concat();

    let crc = crc16(&body);
    body + &crc
}
