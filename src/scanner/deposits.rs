//! Deposit extraction from decoded blocks

use crate::types::Deposit;
use bitcoin::{Address, Block, Network};

/// Every output in `block` that pays a standard address on `network`.
///
/// Outputs without an address form (OP_RETURN, bare multisig, non-standard
/// scripts) are skipped.
pub fn extract_deposits(block: &Block, height: u64, network: Network) -> Vec<Deposit> {
    let mut deposits = Vec::new();

    for transaction in &block.txdata {
        let txid = transaction.compute_txid().to_string();
        for (vout, output) in transaction.output.iter().enumerate() {
            if let Ok(address) = Address::from_script(&output.script_pubkey, network) {
                deposits.push(Deposit {
                    address: address.to_string(),
                    amount_sat: output.value.to_sat(),
                    txid: txid.clone(),
                    vout: vout as u32,
                    height,
                });
            }
        }
    }

    deposits
}
