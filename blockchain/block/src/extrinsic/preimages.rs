/*
    Preimages are static data which is presently being requested to be
    available for workloads to fetch on demand. Each provided blob is indexed
    under its Blake2b-256 digest, and the availability record for the pair
    (digest, length) gains the current timeslot. The record is append-only:
    the timeslot history is what historical lookup scans.
*/

use crypto::blake2b;
use jam_types::{Preimage, PreimageKey, ProcessError, ServiceAccounts, TimeSlot};

/// Integrate the block's preimages. A missing requester account is a
/// spec-level error which aborts the whole block.
pub fn process(
    preimages: &[Preimage],
    services: &mut ServiceAccounts,
    tau: TimeSlot,
) -> Result<(), ProcessError> {
    for preimage in preimages {
        let Some(account) = services.get_mut(&preimage.requester) else {
            log::error!("preimage requester {} not found", preimage.requester);
            return Err(ProcessError::ServiceNotFound(preimage.requester));
        };

        let hash = blake2b(&preimage.blob);
        let length = preimage.blob.len() as u32;
        log::debug!(
            "service {}: preimage {} of {} octets",
            preimage.requester,
            utils::print_hash!(hash),
            length
        );

        account.preimages.insert(hash, preimage.blob.clone());
        account
            .lookup
            .entry(PreimageKey { hash, length })
            .or_default()
            .push(tau);
    }

    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use jam_types::ServiceAccount;

    fn services_with(id: u32) -> ServiceAccounts {
        let mut services = ServiceAccounts::new();
        services.insert(id, ServiceAccount::default());
        services
    }

    #[test]
    fn preimage_is_indexed_under_its_digest() {
        let mut services = services_with(7);
        let blob = vec![1u8, 2, 3];
        let hash = blake2b(&blob);

        process(&[Preimage { requester: 7, blob: blob.clone() }], &mut services, 42).unwrap();

        let account = &services[&7];
        assert_eq!(account.preimages[&hash], blob);
        assert_eq!(account.lookup[&PreimageKey { hash, length: 3 }], vec![42]);
    }

    #[test]
    fn availability_record_is_append_only() {
        let mut services = services_with(7);
        let blob = vec![9u8; 5];
        let hash = blake2b(&blob);

        process(&[Preimage { requester: 7, blob: blob.clone() }], &mut services, 10).unwrap();
        process(&[Preimage { requester: 7, blob }], &mut services, 20).unwrap();

        assert_eq!(
            services[&7].lookup[&PreimageKey { hash, length: 5 }],
            vec![10, 20]
        );
    }

    #[test]
    fn missing_service_aborts_the_block() {
        let mut services = services_with(7);
        let result = process(
            &[Preimage { requester: 8, blob: vec![1] }],
            &mut services,
            1,
        );
        assert_eq!(result, Err(ProcessError::ServiceNotFound(8)));
    }
}
