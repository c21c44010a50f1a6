use rand::Rng;

const BOUNDARY_PREFIX: &str = "--------------------------";
const BOUNDARY_ID_LEN: usize = 24;

pub fn generate_rand_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    let chars: String = (0..len)
        .map(|_| {
            let i = rng.gen_range(0..36);
            if i < 26 {
                (b'a' + i) as char
            } else {
                (b'0' + (i - 26)) as char
            }
        })
        .collect();
    chars
}

// multipart boundary: dash prefix followed by a random token
pub fn generate_boundary() -> String {
    format!("{}{}", BOUNDARY_PREFIX, generate_rand_id(BOUNDARY_ID_LEN))
}
