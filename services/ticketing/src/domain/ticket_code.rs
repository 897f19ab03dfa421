use rand::RngExt;

/// Uppercase alphanumerics without the look-alikes `0 O 1 I`.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const GROUPS: usize = 4;
const GROUP_LEN: usize = 4;

/// Random scan code shaped `XXXX-XXXX-XXXX-XXXX`.
///
/// 16 symbols over a 32-letter alphabet give 80 bits; the unique index on
/// `tickets.code` catches the rare collision and the issuance is retried.
pub fn generate() -> String {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(GROUPS * GROUP_LEN + GROUPS - 1);
    for group in 0..GROUPS {
        if group > 0 {
            code.push('-');
        }
        for _ in 0..GROUP_LEN {
            code.push(ALPHABET[rng.random_range(0..ALPHABET.len())] as char);
        }
    }
    code
}

pub fn is_well_formed(code: &str) -> bool {
    let groups: Vec<&str> = code.split('-').collect();
    groups.len() == GROUPS
        && groups
            .iter()
            .all(|g| g.len() == GROUP_LEN && g.bytes().all(|b| ALPHABET.contains(&b)))
}
