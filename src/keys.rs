//! Address and key generation, delegated to `bitcoin` / `secp256k1`

use bitcoin::secp256k1::{rand, PublicKey, Secp256k1, SecretKey};
use bitcoin::{Address, Network};

/// Fresh secp256k1 key pair from the thread-local CSPRNG
pub fn generate_key_pair() -> (PublicKey, SecretKey) {
    let secp = Secp256k1::new();
    let (secret_key, public_key) = secp.generate_keypair(&mut rand::thread_rng());
    (public_key, secret_key)
}

/// P2PKH address for a compressed public key
pub fn address_from_pubkey(public_key: &PublicKey, network: Network) -> Address {
    let public_key = bitcoin::PublicKey::new(*public_key);
    Address::p2pkh(public_key.pubkey_hash(), network)
}
