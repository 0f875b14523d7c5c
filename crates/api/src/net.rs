//! Local network address discovery for the setup screen.

use std::net::Ipv4Addr;

/// IPv4 addresses of all interfaces that are up and not loopback, in
/// interface order.
///
/// Blocking: call from `spawn_blocking`.
pub fn non_loopback_ipv4() -> std::io::Result<Vec<Ipv4Addr>> {
    let mut head: *mut libc::ifaddrs = std::ptr::null_mut();

    // Safety: `getifaddrs` initialises `head` on success; the list is
    // released with `freeifaddrs` below and not used afterwards.
    if unsafe { libc::getifaddrs(&mut head) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    let mut ips = Vec::new();
    let mut cursor = head;
    while !cursor.is_null() {
        // Safety: `cursor` is a non-null node of the list returned above.
        let entry = unsafe { &*cursor };
        cursor = entry.ifa_next;

        if entry.ifa_addr.is_null() {
            continue;
        }
        let loopback_flag = entry.ifa_flags & (libc::IFF_LOOPBACK as libc::c_uint) != 0;

        // Safety: `ifa_addr` is non-null and points at a sockaddr.
        let family = unsafe { (*entry.ifa_addr).sa_family };
        if i32::from(family) != libc::AF_INET {
            continue;
        }

        // Safety: an `AF_INET` address is a `sockaddr_in`.
        let sin = unsafe { &*(entry.ifa_addr as *const libc::sockaddr_in) };
        let addr = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));
        if is_reportable(addr, loopback_flag) {
            ips.push(addr);
        }
    }

    // Safety: `head` came from a successful `getifaddrs` call.
    unsafe { libc::freeifaddrs(head) };

    Ok(ips)
}

fn is_reportable(addr: Ipv4Addr, loopback_flag: bool) -> bool {
    !loopback_flag && !addr.is_loopback() && !addr.is_unspecified()
}
