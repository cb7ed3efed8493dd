#![no_main]

use libfuzzer_sys::fuzz_target;

use tidal_ledger::{AccessPolicy, Account, Ledger};
use tidal_rate::RateHistory;
use tidal_types::{Address, Timestamp, WITHDRAW_ALL};

fn word(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

// Drive accrual and ledger operations with arbitrary amounts, rates and
// times. Overflow must surface as an error, never a panic, and every
// accepted operation must keep the supply invariant.
fuzz_target!(|data: &[u8]| {
    if data.len() < 24 {
        return;
    }

    let account = Account {
        principal: word(&data[0..]) as u128 * word(&data[8..]) as u128,
        rate: word(&data[8..]) as u128,
        last_settled: Timestamp::new(word(&data[16..]) % 1_000_000),
    };
    let _ = account.balance_at(Timestamp::new(word(&data[16..])));
    let mut settled = account.clone();
    let _ = settled.settle(Timestamp::new(word(&data[16..])));

    let custody = Address::new("tdl_custody");
    let holders = [Address::new("tdl_a"), Address::new("tdl_b")];
    let mut ledger =
        Ledger::new(AccessPolicy::new(Address::new("tdl_owner")).with_privileged([custody.clone()]));
    let mut history = RateHistory::new(word(&data[8..]) as u128, Timestamp::EPOCH);

    let mut now = 0u64;
    for chunk in data[24..].chunks_exact(17) {
        let op = chunk[0] % 5;
        let amount = word(&chunk[1..]) as u128;
        let arg = word(&chunk[9..]);
        now = now.saturating_add(arg % 100_000);
        let at = Timestamp::new(now);
        let who = &holders[(arg & 1) as usize];
        let other = &holders[((arg & 1) ^ 1) as usize];

        match op {
            0 => {
                let _ = ledger.grant(&custody, who, amount, arg as u128, at);
            }
            1 => {
                let amount = if arg & 2 == 0 { amount } else { WITHDRAW_ALL };
                let _ = ledger.withdraw(&custody, who, amount, at);
            }
            2 => {
                let _ = ledger.transfer(who, other, amount, at);
            }
            3 => {
                let _ = ledger.settle(who, at);
            }
            _ => {
                let _ = history.push(amount, at);
                let _ = history.rate_at(Timestamp::new(arg));
            }
        }
        assert!(ledger.check_supply());
        let _ = ledger.computed_total_supply(at);
    }
});
