use crate::fault::FaultCode;
use crate::memory::map::{region_of, MemoryRegion};

/// Checks whether an instruction may be fetched from `addr`.
///
/// Fetch is legal from either code region and never from a data region. The
/// privilege bit plays no part here: user-mode programs run OS trap handlers
/// after `PSR[15]` has already been raised by the trap instruction.
///
/// # Errors
///
/// Returns [`FaultCode::FetchProtection`] for data-region addresses.
pub const fn validate_fetch_access(addr: u16) -> Result<(), FaultCode> {
    match region_of(addr) {
        MemoryRegion::UserCode | MemoryRegion::OsCode => Ok(()),
        MemoryRegion::UserData | MemoryRegion::OsData => Err(FaultCode::FetchProtection),
    }
}

/// Checks whether a load or store may touch `addr`.
///
/// Data access is legal in user data always, in OS data only when
/// `privileged` is set, and never in either code region.
///
/// # Errors
///
/// Returns [`FaultCode::DataProtection`] when the policy denies the access.
pub const fn validate_data_access(addr: u16, privileged: bool) -> Result<(), FaultCode> {
    match region_of(addr) {
        MemoryRegion::UserData => Ok(()),
        MemoryRegion::OsData if privileged => Ok(()),
        MemoryRegion::UserCode | MemoryRegion::OsCode | MemoryRegion::OsData => {
            Err(FaultCode::DataProtection)
        }
    }
}
