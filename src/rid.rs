//! Resource identifiers and filters.
//!
//! Grounded in `original_source/lib/s4py/resource.py`'s `ResourceID` /
//! `ResourceFilter` classes: three text forms with auto-detecting parse,
//! and a filter that matches iff every specified component agrees. The
//! source's process-wide `DEFAULT_FMT` is re-architected per spec.md §9's
//! redesign flag into an explicit parameter (`RidFormat`) on the formatter
//! rather than global mutable state.

use std::fmt;

use crate::result::{Error, Result};

/// A DBPF resource id: `(group, instance, type)`. Equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rid {
    pub group: u32,
    pub instance: u64,
    pub type_id: u32,
}

impl Rid {
    pub fn new(group: u32, instance: u64, type_id: u32) -> Self {
        Self { group, instance, type_id }
    }

    /// An RID is trivially its own filter: it matches only itself.
    pub fn matches(&self, other: &Rid) -> bool {
        self == other
    }

    pub fn to_string_as(&self, fmt: RidFormat) -> String {
        match fmt {
            RidFormat::Colon => format!("{:08x}:{:016x}:{:08x}", self.group, self.instance, self.type_id),
            RidFormat::Maxis => format!("{:08x}!{:016x}.{:08x}", self.group, self.instance, self.type_id),
            RidFormat::S4pe => format!("S4_{:08X}_{:08X}_{:016X}", self.type_id, self.group, self.instance),
        }
    }

    /// Parse any of the three interchange forms, auto-detecting which one
    /// was used.
    pub fn parse(s: &str) -> Result<Rid> {
        if let Some(rid) = parse_colon(s) {
            return Ok(rid);
        }
        if let Some(rid) = parse_maxis(s) {
            return Ok(rid);
        }
        if let Some(rid) = parse_s4pe(s) {
            return Ok(rid);
        }
        Err(Error::InvalidRid(s.to_string()))
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_as(RidFormat::Colon))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RidFormat {
    Colon,
    Maxis,
    S4pe,
}

fn parse_colon(s: &str) -> Option<Rid> {
    let mut parts = s.splitn(3, ':');
    let group = parts.next()?;
    let instance = parts.next()?;
    let type_id = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rid::new(
        u32::from_str_radix(group, 16).ok()?,
        u64::from_str_radix(instance, 16).ok()?,
        u32::from_str_radix(type_id, 16).ok()?,
    ))
}

fn parse_maxis(s: &str) -> Option<Rid> {
    let (group, rest) = s.split_once('!')?;
    let (instance, type_id) = rest.split_once('.')?;
    Some(Rid::new(
        u32::from_str_radix(group, 16).ok()?,
        u64::from_str_radix(instance, 16).ok()?,
        u32::from_str_radix(type_id, 16).ok()?,
    ))
}

fn parse_s4pe(s: &str) -> Option<Rid> {
    let rest = s.strip_prefix("S4_")?;
    // trailing "%%..." is an optional disambiguating suffix, ignored here.
    let rest = rest.split("%%").next().unwrap_or(rest);
    let mut parts = rest.splitn(3, '_');
    let type_id = parts.next()?;
    let group = parts.next()?;
    let instance = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rid::new(
        u32::from_str_radix(group, 16).ok()?,
        u64::from_str_radix(instance, 16).ok()?,
        u32::from_str_radix(type_id, 16).ok()?,
    ))
}

/// A closed set of filter shapes, per spec.md §9's "Filter composition"
/// design note: an exact RID, a wildcarded triple, or an any-of list.
#[derive(Debug, Clone)]
pub enum ResourceFilter {
    Exact(Rid),
    Wildcard {
        group: Option<u32>,
        instance: Option<u64>,
        type_id: Option<u32>,
    },
    AnyOf(Vec<ResourceFilter>),
}

impl ResourceFilter {
    pub fn exact(rid: Rid) -> Self {
        ResourceFilter::Exact(rid)
    }

    pub fn wildcard(group: Option<u32>, instance: Option<u64>, type_id: Option<u32>) -> Self {
        ResourceFilter::Wildcard { group, instance, type_id }
    }

    pub fn matches(&self, rid: &Rid) -> bool {
        match self {
            ResourceFilter::Exact(exact) => exact.matches(rid),
            ResourceFilter::Wildcard { group, instance, type_id } => {
                group.map_or(true, |g| g == rid.group)
                    && instance.map_or(true, |i| i == rid.instance)
                    && type_id.map_or(true, |t| t == rid.type_id)
            }
            ResourceFilter::AnyOf(filters) => filters.iter().any(|f| f.matches(rid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rid_text_forms_round_trip() {
        let rid = Rid::new(0x11111111, 0x2222222222222222, 0x33333333);
        for fmt in [RidFormat::Colon, RidFormat::Maxis, RidFormat::S4pe] {
            let text = rid.to_string_as(fmt);
            assert_eq!(Rid::parse(&text).unwrap(), rid);
        }
    }

    #[test]
    fn parse_is_surjective_over_the_three_forms() {
        assert!(Rid::parse("00000007:0000000000000042:11111111").is_ok());
        assert!(Rid::parse("00000007!0000000000000042.11111111").is_ok());
        assert!(Rid::parse("S4_11111111_00000007_0000000000000042").is_ok());
    }

    #[test]
    fn wildcard_filter_matches_unset_components() {
        let rid = Rid::new(7, 42, 0x11111111);
        let filter = ResourceFilter::wildcard(Some(7), None, None);
        assert!(filter.matches(&rid));
        let filter = ResourceFilter::wildcard(Some(8), None, None);
        assert!(!filter.matches(&rid));
    }

    #[test]
    fn any_of_is_a_disjunction() {
        let a = Rid::new(1, 1, 1);
        let b = Rid::new(2, 2, 2);
        let c = Rid::new(3, 3, 3);
        let filter = ResourceFilter::AnyOf(vec![ResourceFilter::exact(a), ResourceFilter::exact(b)]);
        assert!(filter.matches(&a));
        assert!(filter.matches(&b));
        assert!(!filter.matches(&c));
    }
}
