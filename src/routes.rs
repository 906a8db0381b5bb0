//! Route table.
//!
//! Routes are declared once, in sidebar order. A route's page is built by
//! its loader the first time the route is visited.

use crate::config::Config;
use crate::pages::{ComingSoonPage, MarketCapPage, Page, PricesPage};
use chrono::NaiveDate;

/// Builds the page of a route.
pub type Loader = fn(&Config, NaiveDate) -> Box<dyn Page>;

pub struct RouteEntry {
    pub path: &'static str,
    pub title: &'static str,
    /// Sidebar group label, if the route is nested under one
    pub group: Option<&'static str>,
    pub loader: Loader,
}

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    /// Index into [`ROUTES`]
    Route(usize),
    Group {
        label: &'static str,
        children: Vec<usize>,
    },
}

pub const HOME_PATH: &str = "/";

const UNIVERSE_GROUP: &str = "Investment Universe";

pub static ROUTES: &[RouteEntry] = &[
    RouteEntry {
        path: HOME_PATH,
        title: "Dashboard",
        group: None,
        loader: dashboard,
    },
    RouteEntry {
        path: "/universe/market-cap",
        title: "Market Cap",
        group: Some(UNIVERSE_GROUP),
        loader: market_cap,
    },
    RouteEntry {
        path: "/universe/prices",
        title: "Prices",
        group: Some(UNIVERSE_GROUP),
        loader: prices,
    },
    RouteEntry {
        path: "/strategy",
        title: "Strategy",
        group: None,
        loader: strategy,
    },
    RouteEntry {
        path: "/positioning",
        title: "Positioning",
        group: None,
        loader: positioning,
    },
    RouteEntry {
        path: "/performance",
        title: "Performance",
        group: None,
        loader: performance,
    },
    RouteEntry {
        path: "/risk-metrics",
        title: "Risk Metrics",
        group: None,
        loader: risk_metrics,
    },
    RouteEntry {
        path: "/market-risk",
        title: "Market Risk",
        group: None,
        loader: market_risk,
    },
];

fn dashboard(_: &Config, _: NaiveDate) -> Box<dyn Page> {
    Box::new(ComingSoonPage::new(
        "Dashboard",
        "Overview of portfolio analytics and key metrics",
        2,
    ))
}

fn market_cap(config: &Config, _: NaiveDate) -> Box<dyn Page> {
    Box::new(MarketCapPage::new(config))
}

fn prices(config: &Config, today: NaiveDate) -> Box<dyn Page> {
    Box::new(PricesPage::new(config, today))
}

fn strategy(_: &Config, _: NaiveDate) -> Box<dyn Page> {
    Box::new(ComingSoonPage::new(
        "Strategy & Portfolio Optimization",
        "Portfolio optimization with constraints, allocation grid",
        3,
    ))
}

fn positioning(_: &Config, _: NaiveDate) -> Box<dyn Page> {
    Box::new(ComingSoonPage::new(
        "Positioning & PnL",
        "Current positions vs model, PnL breakdown",
        4,
    ))
}

fn performance(_: &Config, _: NaiveDate) -> Box<dyn Page> {
    Box::new(ComingSoonPage::new(
        "Strategy Returns",
        "Performance charts, drawdown, rolling volatility",
        5,
    ))
}

fn risk_metrics(_: &Config, _: NaiveDate) -> Box<dyn Page> {
    Box::new(ComingSoonPage::new(
        "Risk Metrics",
        "Ex-Post, Ex-Ante, Calendar, VaR metrics",
        6,
    ))
}

fn market_risk(_: &Config, _: NaiveDate) -> Box<dyn Page> {
    Box::new(ComingSoonPage::new(
        "Market Risk Analytics",
        "PCA analysis, correlation matrices",
        7,
    ))
}

/// Index of the route for `path`. Trailing slashes are ignored.
pub fn resolve(path: &str) -> Option<usize> {
    let trimmed = path.trim_end_matches('/');
    let wanted = if trimmed.is_empty() { HOME_PATH } else { trimmed };
    ROUTES.iter().position(|route| route.path == wanted)
}

pub fn home() -> usize {
    resolve(HOME_PATH).unwrap_or(0)
}

/// Sidebar tree: top-level routes and groups, in declaration order.
pub fn nav_items() -> Vec<NavItem> {
    let mut items: Vec<NavItem> = Vec::new();
    for (index, route) in ROUTES.iter().enumerate() {
        let Some(label) = route.group else {
            items.push(NavItem::Route(index));
            continue;
        };
        match items.iter_mut().find_map(|item| match item {
            NavItem::Group { label: l, children } if *l == label => Some(children),
            _ => None,
        }) {
            Some(children) => children.push(index),
            None => items.push(NavItem::Group {
                label,
                children: vec![index],
            }),
        }
    }
    items
}

/// Route indices in the order the sidebar lists them.
pub fn sidebar_order() -> Vec<usize> {
    nav_items()
        .into_iter()
        .flat_map(|item| match item {
            NavItem::Route(index) => vec![index],
            NavItem::Group { children, .. } => children,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("/"), Some(0));
        assert_eq!(resolve(""), Some(0));
        assert_eq!(resolve("/universe/prices/"), Some(2));
        assert_eq!(resolve("/universe"), None);
        assert_eq!(resolve("/nowhere"), None);
    }

    #[test]
    fn test_paths_are_unique() {
        for (i, route) in ROUTES.iter().enumerate() {
            assert_eq!(resolve(route.path), Some(i), "duplicate path {}", route.path);
        }
    }

    #[test]
    fn test_nav_items_group_universe_routes() {
        let items = nav_items();
        assert_eq!(items[0], NavItem::Route(0));
        assert_eq!(
            items[1],
            NavItem::Group {
                label: UNIVERSE_GROUP,
                children: vec![1, 2],
            }
        );
        assert_eq!(items.len(), ROUTES.len() - 1);
        assert_eq!(sidebar_order(), (0..ROUTES.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_loaders_build_pages() {
        let config = Config::default();
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        for route in ROUTES {
            let page = (route.loader)(&config, today);
            assert!(!format!("{page:?}").is_empty());
        }
    }
}
