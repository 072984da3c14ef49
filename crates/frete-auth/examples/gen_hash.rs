//! Password hash generator utility
//!
//! Usage: cargo run --example gen_hash -p frete-auth [password]
//!
//! Generates an Argon2id password hash that can be inserted into the
//! usuarios table to seed the first superadmin.

use frete_auth::PasswordService;

fn main() {
    let password = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "admin123".to_string());

    let service = PasswordService::new();
    let hash = service
        .hash_password(&password)
        .expect("Failed to hash password");

    println!("Password: {}", password);
    println!("Hash: {}", hash);
    println!();
    println!("SQL para inserir o superadmin:");
    println!("INSERT INTO usuarios (username, password_hash, nome, role, tenant_id, ativo)");
    println!(
        "VALUES ('admin', '{}', 'Administrador', 'superadmin', gen_random_uuid(), true);",
        hash
    );
}
