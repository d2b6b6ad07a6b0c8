use chrono::NaiveDate;

/// Message the customer carries into the WhatsApp conversation after a
/// booking is accepted.
pub fn booking_message(
    service_name: &str,
    date: NaiveDate,
    time: &str,
    customer_name: &str,
    customer_phone: &str,
    paid_via_pix: bool,
) -> String {
    let payment_line = if paid_via_pix {
        "\n\n*Pagamento:* Pago via PIX"
    } else {
        "\n\n*Pagamento:* Será realizado presencialmente"
    };
    format!(
        "Olá! Gostaria de agendar:\n\n*Serviço:* {service_name}\n*Data:* {}\n*Horário:* {time}\n*Nome:* {customer_name}\n*Telefone:* {customer_phone}{payment_line}",
        date.format("%d/%m/%Y"),
    )
}

/// wa.me deep link. Everything that is not a digit is stripped from the
/// destination number; the message is percent-encoded.
pub fn deep_link(whatsapp_number: &str, message: &str) -> String {
    let digits: String = whatsapp_number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    format!("https://wa.me/{digits}?text={}", percent_encode(message))
}

/// encodeURIComponent-compatible encoding over UTF-8 bytes.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
