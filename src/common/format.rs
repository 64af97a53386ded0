// src/common/format.rs

/// Mantém apenas os dígitos de um telefone ("(11) 99999-8888" -> "11999998888").
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formata um telefone brasileiro para exibição.
///
/// Até 10 dígitos vira `(DD) DDDD-DDDD`, a partir de 11 vira `(DD) DDDDD-DDDD`.
/// Entradas curtas demais para o primeiro bloco voltam só com os dígitos,
/// e dígitos além do 11º ficam no final, sem formatação.
pub fn format_phone(value: &str) -> String {
    let digits = phone_digits(value);
    let middle = if digits.len() <= 10 { 4 } else { 5 };

    // Precisa de DDD + bloco do meio completos para formatar
    if digits.len() < 2 + middle {
        return digits;
    }

    let (ddd, rest) = digits.split_at(2);
    let (first, rest) = rest.split_at(middle);
    let last_len = rest.len().min(4);
    let (last, tail) = rest.split_at(last_len);

    let mut formatted = format!("({}) {}", ddd, first);
    if !last.is_empty() {
        formatted.push('-');
        formatted.push_str(last);
    }
    formatted.push_str(tail);
    formatted
}

/// Iniciais do avatar: duas primeiras letras antes do "@", em maiúsculas.
pub fn initials(email: Option<&str>) -> String {
    email
        .and_then(|e| e.split('@').next())
        .map(|local| local.chars().take(2).collect::<String>().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "U".to_string())
}
