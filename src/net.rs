use std::net::{IpAddr, Ipv4Addr};

use crate::error::{AppError, AppResult};

/// First non-loopback IPv4 address among the local interfaces.
pub fn local_ipv4() -> AppResult<Ipv4Addr> {
    let interfaces = if_addrs::get_if_addrs()?;
    first_lan_ipv4(interfaces.iter().filter(|i| !i.is_loopback()).map(|i| i.ip()))
        .ok_or(AppError::NetworkUnavailable)
}

fn first_lan_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|ip| match ip {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
        _ => None,
    })
}

/// `ip:port` as shown to the user and embedded in listing pages.
pub fn advertised_addr(ip: Ipv4Addr, port: u16) -> String {
    format!("{}:{}", ip, port)
}
