pub mod cipher;
pub mod passphrase;
