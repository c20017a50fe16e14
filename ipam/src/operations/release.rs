//! Release a previously allocated address.

use std::net::Ipv4Addr;

use crate::config::Pool;
use crate::error::{Error, Result};
use crate::ledger::LedgerSession;
use crate::pool::PoolAllocator;

use super::commit;

/// Validate `address` against `pool`, remove it from the ledger and persist.
///
/// The pool's own entries are searched first, then legacy unscoped entries,
/// so addresses handed out before the ledger was kept per pool can still be
/// released through any pool whose block contains them.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] or [`Error::AddressNotInPool`] if the
/// address fails validation, [`Error::NotAssigned`] if it is not recorded,
/// and [`Error::PersistFailure`] if the ledger cannot be written. The
/// session's ledger is unchanged on error.
pub fn release(session: &mut LedgerSession, pool: &Pool, address: &str) -> Result<Ipv4Addr> {
    let allocator = PoolAllocator::from_pool(pool)?;
    let address = allocator.validate_membership(address)?;
    let before = session.ledger().clone();

    match allocator.release(before.assigned(&pool.name), address) {
        Ok(remaining) => session.ledger_mut().set_assigned(&pool.name, remaining),
        Err(Error::NotAssigned { .. }) if before.unscoped().contains(&address) => {
            let remaining = allocator.release(before.unscoped(), address)?;
            log::debug!("releasing {address} from legacy unscoped entries");
            session.ledger_mut().set_unscoped(remaining);
        }
        Err(e) => return Err(e),
    }

    commit(session, before)?;
    log::info!("released {address} from pool '{}'", pool.name);
    Ok(address)
}
