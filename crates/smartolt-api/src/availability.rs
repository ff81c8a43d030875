// Port availability per distribution box.
//
// ONUs reference their box by name, not id, so the join key is the
// lower-cased, trimmed name. Boxes are never merged: two boxes whose names
// normalize to the same key both report the shared count.

use std::collections::HashMap;

use crate::models::{Odb, OdbAvailability, OnuListItem};

fn join_key(name: &str) -> String {
    name.to_lowercase().trim().to_owned()
}

/// Compute used and available ports for each box.
///
/// Returns one record per entry of `odbs`, in the same order. ONUs with a
/// blank box name are ignored. `available_ports` is not clamped, so an
/// over-provisioned box comes back negative.
pub fn calculate_odb_availability(odbs: &[Odb], onus: &[OnuListItem]) -> Vec<OdbAvailability> {
    let mut used_by_odb: HashMap<String, i64> = HashMap::new();
    for onu in onus {
        let key = join_key(&onu.odb_name);
        if key.is_empty() {
            continue;
        }
        *used_by_odb.entry(key).or_insert(0) += 1;
    }

    odbs.iter()
        .map(|odb| {
            let used = used_by_odb
                .get(&join_key(&odb.name))
                .copied()
                .unwrap_or(0);
            OdbAvailability {
                odb_id: odb.id.clone(),
                odb_name: odb.name.clone(),
                total_ports: odb.ports,
                used_ports: used,
                available_ports: odb.ports - used,
            }
        })
        .collect()
}
