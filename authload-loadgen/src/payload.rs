use authload_common::{OrderItem, OrderRequest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Product ids seeded by the catalog service.
pub const PRODUCT_CATALOG: [u64; 3] = [1, 2, 3];

pub const MAX_ITEMS_PER_ORDER: usize = 2;

pub const MAX_QUANTITY: u32 = 3;

/// Draw a random order: between 1 and `min(MAX_ITEMS_PER_ORDER, catalog size)`
/// line items, each a random catalog product with quantity `1..=MAX_QUANTITY`.
/// Products may repeat within one order.
pub fn build_order(rng: &mut impl Rng) -> OrderRequest {
    let max_items = MAX_ITEMS_PER_ORDER.min(PRODUCT_CATALOG.len());
    let count = rng.gen_range(1..=max_items);
    let items = (0..count)
        .map(|_| OrderItem {
            product_id: PRODUCT_CATALOG[rng.gen_range(0..PRODUCT_CATALOG.len())],
            quantity: rng.gen_range(1..=MAX_QUANTITY),
        })
        .collect();
    OrderRequest { items }
}

/// Sub-seed for the worker at `worker_idx`, so workers running in parallel
/// each own an independent, reproducible stream.
pub fn derive_seed(seed: u64, worker_idx: usize) -> u64 {
    seed ^ (worker_idx as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Random source for one worker: seeded from `seed` when given, from OS
/// entropy otherwise.
pub fn worker_rng(seed: Option<u64>, worker_idx: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(derive_seed(seed, worker_idx)),
        None => StdRng::from_entropy(),
    }
}
