//! The store facade
//!
//! All state sits behind one `RwLock`. Mutating calls hold the write lock for
//! their whole duration (including event emission), so readers see a batch
//! either fully applied or not at all. Queries share the read lock.

use errors::{forbidden, FeedError, FeedResult};
use feed_model::{
    validate_batch_len, validate_median_batch, Address, AssetKey, EventEnvelope, FeedEntry,
    FeedEvent, FeedKind, MedianData, PostMode, PostReport, PriceData, ReferenceData,
    RejectedRecord, Role,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::access::AccessControl;
use crate::config::StoreConfig;
use crate::gates::{FeatureGates, Whitelist};
use crate::notify::{EventNotifier, DEFAULT_EVENT_CAPACITY};
use crate::snapshot::FeedSnapshot;
use crate::storage::FeedTable;
use crate::time::{SystemTimeProvider, TimeProvider};

/// Value of the unit-of-account symbol, 1.0 at 9 decimals
pub const BASE_SYMBOL_VALUE: u64 = 1_000_000_000;

/// Scale applied to reference rates
pub const RATE_SCALE: u128 = 1_000_000_000_000_000_000;

#[derive(Debug)]
struct FeedState {
    access: AccessControl,
    gates: FeatureGates,
    whitelist: Whitelist,
    prices: FeedTable<PriceData>,
    deviations: FeedTable<PriceData>,
    medians: FeedTable<MedianData>,
}

/// Record and role counts, for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub prices: usize,
    pub deviations: usize,
    pub medians: usize,
    pub admins: usize,
    pub relayers: usize,
    pub whitelisted: usize,
    pub events_emitted: u64,
}

#[derive(Debug)]
pub struct PriceFeed {
    state: RwLock<FeedState>,
    config: StoreConfig,
    base_key: AssetKey,
    notifier: EventNotifier,
}

impl PriceFeed {
    /// Create an empty store; `creator` becomes owner, admin and relayer
    pub fn new(creator: Address, config: StoreConfig) -> FeedResult<Self> {
        let state = FeedState {
            access: AccessControl::new(creator)?,
            gates: FeatureGates::default(),
            whitelist: Whitelist::default(),
            prices: FeedTable::new(),
            deviations: FeedTable::new(),
            medians: FeedTable::new(),
        };
        let feed = Self::assemble(state, config)?;
        info!("Price feed created, owner {}", creator);
        Ok(feed)
    }

    /// Restore a store from a snapshot
    pub fn from_snapshot(snapshot: FeedSnapshot, config: StoreConfig) -> FeedResult<Self> {
        let access = AccessControl::from_parts(
            snapshot.ownership,
            snapshot.admins,
            snapshot.relayers,
        )?;
        let state = FeedState {
            access,
            gates: snapshot.gates,
            whitelist: snapshot.whitelist.into_iter().collect(),
            prices: snapshot.prices.into_iter().collect(),
            deviations: snapshot.deviations.into_iter().collect(),
            medians: snapshot.medians.into_iter().collect(),
        };
        let feed = Self::assemble(state, config)?;
        let stats = feed.stats();
        info!(
            "Price feed restored: {} prices, {} deviations, {} medians, owner {}",
            stats.prices,
            stats.deviations,
            stats.medians,
            feed.owner()
        );
        Ok(feed)
    }

    fn assemble(state: FeedState, config: StoreConfig) -> FeedResult<Self> {
        config.validate()?;
        let base_key = config.base_key()?;
        Ok(Self {
            state: RwLock::new(state),
            config,
            base_key,
            notifier: EventNotifier::new(DEFAULT_EVENT_CAPACITY, Arc::new(SystemTimeProvider)),
        })
    }

    /// Replace the clock used to stamp events
    pub fn with_time_provider(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.notifier = EventNotifier::new(DEFAULT_EVENT_CAPACITY, clock);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.notifier.subscribe()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.read();
        FeedSnapshot {
            version: FeedSnapshot::VERSION,
            ownership: state.access.ownership(),
            admins: state.access.role_members(Role::Admin),
            relayers: state.access.role_members(Role::Relayer),
            gates: state.gates,
            whitelist: state.whitelist.sorted(),
            prices: state.prices.sorted_records(),
            deviations: state.deviations.sorted_records(),
            medians: state.medians.sorted_records(),
        }
    }

    pub fn stats(&self) -> FeedStats {
        let state = self.state.read();
        FeedStats {
            prices: state.prices.len(),
            deviations: state.deviations.len(),
            medians: state.medians.len(),
            admins: state.access.role_members(Role::Admin).len(),
            relayers: state.access.role_members(Role::Relayer).len(),
            whitelisted: state.whitelist.len(),
            events_emitted: self.notifier.last_sequence(),
        }
    }

    // ==================== Access control ====================

    pub fn owner(&self) -> Address {
        self.state.read().access.owner()
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.state.read().access.pending_owner()
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.state.read().access.has_role(role, account)
    }

    pub fn is_relayer(&self, account: &Address) -> bool {
        self.has_role(Role::Relayer, account)
    }

    pub fn grant_role(&self, caller: &Address, role: Role, account: Address) -> FeedResult<()> {
        let mut state = self.state.write();
        authorize(&state.access, Role::Admin, caller, "grant_role")?;
        if state.access.grant(role, account)? {
            info!("Role {} granted to {} by {}", role, account, caller);
            self.notifier.emit(FeedEvent::RoleGranted {
                role,
                account,
                sender: *caller,
            });
        }
        Ok(())
    }

    pub fn revoke_role(&self, caller: &Address, role: Role, account: Address) -> FeedResult<()> {
        let mut state = self.state.write();
        authorize(&state.access, Role::Admin, caller, "revoke_role")?;
        if state.access.revoke(role, &account) {
            info!("Role {} revoked from {} by {}", role, account, caller);
            self.notifier.emit(FeedEvent::RoleRevoked {
                role,
                account,
                sender: *caller,
            });
        }
        Ok(())
    }

    /// Grant the relayer role to every address; nothing is granted if any is invalid
    pub fn add_relayers(&self, caller: &Address, accounts: &[Address]) -> FeedResult<()> {
        let mut state = self.state.write();
        authorize(&state.access, Role::Admin, caller, "add_relayers")?;
        validate_batch_len(accounts.len(), self.config.max_batch_size)?;
        if accounts.iter().any(Address::is_zero) {
            return Err(FeedError::invalid_parameter(
                "addresses",
                "zero address is not allowed",
            ));
        }

        for account in accounts {
            if state.access.grant(Role::Relayer, *account)? {
                self.notifier.emit(FeedEvent::RoleGranted {
                    role: Role::Relayer,
                    account: *account,
                    sender: *caller,
                });
            }
        }
        info!("{} relayer(s) added by {}", accounts.len(), caller);
        Ok(())
    }

    pub fn remove_relayers(&self, caller: &Address, accounts: &[Address]) -> FeedResult<()> {
        let mut state = self.state.write();
        authorize(&state.access, Role::Admin, caller, "remove_relayers")?;
        validate_batch_len(accounts.len(), self.config.max_batch_size)?;

        for account in accounts {
            if state.access.revoke(Role::Relayer, account) {
                self.notifier.emit(FeedEvent::RoleRevoked {
                    role: Role::Relayer,
                    account: *account,
                    sender: *caller,
                });
            }
        }
        info!("{} relayer(s) removed by {}", accounts.len(), caller);
        Ok(())
    }

    /// First step of the handshake; owner and roles stay unchanged
    pub fn transfer_ownership(&self, caller: &Address, new_owner: Address) -> FeedResult<()> {
        let mut state = self.state.write();
        state
            .access
            .begin_transfer(caller, new_owner)
            .map_err(|e| log_rejection(caller, "transfer_ownership", e))?;
        info!("Ownership transfer started: {} -> {}", caller, new_owner);
        self.notifier.emit(FeedEvent::OwnershipTransferStarted {
            previous_owner: *caller,
            new_owner,
        });
        Ok(())
    }

    /// Second step; moves admin and relayer from the previous owner to the caller
    pub fn claim_ownership(&self, caller: &Address) -> FeedResult<()> {
        let mut state = self.state.write();
        let previous = state
            .access
            .claim(caller)
            .map_err(|e| log_rejection(caller, "claim_ownership", e))?;

        for role in Role::ALL {
            self.notifier.emit(FeedEvent::RoleRevoked {
                role,
                account: previous,
                sender: *caller,
            });
        }
        for role in Role::ALL {
            self.notifier.emit(FeedEvent::RoleGranted {
                role,
                account: *caller,
                sender: *caller,
            });
        }
        self.notifier.emit(FeedEvent::OwnershipTransferred {
            previous_owner: previous,
            new_owner: *caller,
        });
        info!("Ownership transferred: {} -> {}", previous, caller);
        Ok(())
    }

    // ==================== Gates & whitelist ====================

    pub fn gates(&self) -> FeatureGates {
        self.state.read().gates
    }

    pub fn whitelist_enabled(&self) -> bool {
        self.gates().whitelist_enabled
    }

    pub fn median_query_disabled(&self) -> bool {
        self.gates().median_query_disabled
    }

    pub fn is_whitelisted(&self, account: &Address) -> bool {
        self.state.read().whitelist.contains(account)
    }

    pub fn set_whitelist_status(&self, caller: &Address, enabled: bool) -> FeedResult<()> {
        let mut state = self.state.write();
        authorize(&state.access, Role::Admin, caller, "set_whitelist_status")?;
        state.gates.whitelist_enabled = enabled;
        info!("Whitelist gate set to {} by {}", enabled, caller);
        self.notifier.emit(FeedEvent::WhitelistStatusChanged { enabled });
        Ok(())
    }

    pub fn set_median_status(&self, caller: &Address, disabled: bool) -> FeedResult<()> {
        let mut state = self.state.write();
        authorize(&state.access, Role::Admin, caller, "set_median_status")?;
        state.gates.median_query_disabled = disabled;
        info!("Median queries disabled={} by {}", disabled, caller);
        self.notifier.emit(FeedEvent::MedianStatusChanged { disabled });
        Ok(())
    }

    pub fn whitelist_address(&self, caller: &Address, account: Address) -> FeedResult<()> {
        let mut state = self.state.write();
        authorize(&state.access, Role::Admin, caller, "whitelist_address")?;
        if state.whitelist.insert(account) {
            info!("{} whitelisted by {}", account, caller);
            self.notifier.emit(FeedEvent::AddressWhitelisted { account });
        }
        Ok(())
    }

    pub fn remove_whitelisted_address(&self, caller: &Address, account: Address) -> FeedResult<()> {
        let mut state = self.state.write();
        authorize(
            &state.access,
            Role::Admin,
            caller,
            "remove_whitelisted_address",
        )?;
        if state.whitelist.remove(&account) {
            info!("{} removed from whitelist by {}", account, caller);
            self.notifier.emit(FeedEvent::AddressRemovedFromWhitelist { account });
        }
        Ok(())
    }

    // ==================== Post pipeline ====================

    pub fn post_prices(
        &self,
        caller: &Address,
        records: Vec<PriceData>,
        mode: PostMode,
    ) -> FeedResult<PostReport> {
        self.post(
            caller,
            FeedKind::Price,
            records,
            mode,
            |_, _| Ok(()),
            |s| &mut s.prices,
            |record| FeedEvent::PricePosted { record },
        )
    }

    pub fn post_deviations(
        &self,
        caller: &Address,
        records: Vec<PriceData>,
        mode: PostMode,
    ) -> FeedResult<PostReport> {
        self.post(
            caller,
            FeedKind::Deviation,
            records,
            mode,
            |_, _| Ok(()),
            |s| &mut s.deviations,
            |record| FeedEvent::DeviationPosted { record },
        )
    }

    /// Every record must carry exactly `median_len` samples
    pub fn post_medians(
        &self,
        caller: &Address,
        records: Vec<MedianData>,
        mode: PostMode,
    ) -> FeedResult<PostReport> {
        self.post(
            caller,
            FeedKind::Median,
            records,
            mode,
            |records, config| validate_median_batch(records, config.median_len),
            |s| &mut s.medians,
            |record| FeedEvent::MedianPosted { record },
        )
    }

    /// Role check first, then batch checks, then per-record commits
    #[allow(clippy::too_many_arguments)]
    fn post<R: FeedEntry>(
        &self,
        caller: &Address,
        kind: FeedKind,
        records: Vec<R>,
        mode: PostMode,
        validate: fn(&[R], &StoreConfig) -> FeedResult<()>,
        table: fn(&mut FeedState) -> &mut FeedTable<R>,
        to_event: fn(R) -> FeedEvent,
    ) -> FeedResult<PostReport> {
        let mut state = self.state.write();
        authorize(&state.access, Role::Relayer, caller, kind.as_str())?;
        validate_batch_len(records.len(), self.config.max_batch_size)?;
        validate(&records, &self.config)?;

        let table = table(&mut *state);
        let mut report = PostReport::new(kind);
        for record in records {
            let asset_name = *record.asset_name();
            match table.put(record.clone(), mode) {
                Ok(()) => {
                    report.accepted.push(asset_name);
                    self.notifier.emit(to_event(record));
                }
                Err(reason) => {
                    warn!("Stale {} record for {} skipped: {:?}", kind, asset_name, reason);
                    report.rejected.push(RejectedRecord { asset_name, reason });
                }
            }
        }

        debug!(
            "{} post by {}: {} accepted, {} rejected",
            kind,
            caller,
            report.accepted.len(),
            report.rejected.len()
        );
        Ok(report)
    }

    // ==================== Query pipeline ====================

    pub fn get_price_data(&self, caller: &Address, key: &AssetKey) -> FeedResult<PriceData> {
        let state = self.state.read();
        check_read_gates(&state, caller, false)?;
        Ok(state.prices.get(key))
    }

    pub fn get_price_data_bulk(
        &self,
        caller: &Address,
        keys: &[AssetKey],
    ) -> FeedResult<Vec<PriceData>> {
        let state = self.state.read();
        check_read_gates(&state, caller, false)?;
        validate_batch_len(keys.len(), self.config.max_batch_size)?;
        Ok(state.prices.get_bulk(keys))
    }

    pub fn get_deviation_data(&self, caller: &Address, key: &AssetKey) -> FeedResult<PriceData> {
        let state = self.state.read();
        check_read_gates(&state, caller, false)?;
        Ok(state.deviations.get(key))
    }

    pub fn get_deviation_data_bulk(
        &self,
        caller: &Address,
        keys: &[AssetKey],
    ) -> FeedResult<Vec<PriceData>> {
        let state = self.state.read();
        check_read_gates(&state, caller, false)?;
        validate_batch_len(keys.len(), self.config.max_batch_size)?;
        Ok(state.deviations.get_bulk(keys))
    }

    pub fn get_median_data(&self, caller: &Address, key: &AssetKey) -> FeedResult<MedianData> {
        let state = self.state.read();
        check_read_gates(&state, caller, true)?;
        Ok(state.medians.get(key))
    }

    pub fn get_median_data_bulk(
        &self,
        caller: &Address,
        keys: &[AssetKey],
    ) -> FeedResult<Vec<MedianData>> {
        let state = self.state.read();
        check_read_gates(&state, caller, true)?;
        validate_batch_len(keys.len(), self.config.max_batch_size)?;
        Ok(state.medians.get_bulk(keys))
    }

    /// Price of `base` expressed in `quote`, scaled by 1e18
    pub fn get_reference_data(
        &self,
        caller: &Address,
        base: &AssetKey,
        quote: &AssetKey,
    ) -> FeedResult<ReferenceData> {
        let state = self.state.read();
        check_read_gates(&state, caller, false)?;
        self.reference(&state, base, quote)
    }

    pub fn get_reference_data_bulk(
        &self,
        caller: &Address,
        pairs: &[(AssetKey, AssetKey)],
    ) -> FeedResult<Vec<ReferenceData>> {
        let state = self.state.read();
        check_read_gates(&state, caller, false)?;
        validate_batch_len(pairs.len(), self.config.max_batch_size)?;
        pairs
            .iter()
            .map(|(base, quote)| self.reference(&state, base, quote))
            .collect()
    }

    fn reference_price(&self, state: &FeedState, key: &AssetKey) -> PriceData {
        if *key == self.base_key {
            PriceData::new(*key, BASE_SYMBOL_VALUE, 0, u64::MAX)
        } else {
            state.prices.get(key)
        }
    }

    fn reference(
        &self,
        state: &FeedState,
        base: &AssetKey,
        quote: &AssetKey,
    ) -> FeedResult<ReferenceData> {
        let base_price = self.reference_price(state, base);
        let quote_price = self.reference_price(state, quote);

        let rate = (u128::from(base_price.value) * RATE_SCALE)
            .checked_div(u128::from(quote_price.value))
            .ok_or_else(|| FeedError::DivisionByZero {
                context: format!("{}/{}: quote price is zero", base, quote),
            })?;

        Ok(ReferenceData {
            rate,
            last_updated_base: base_price.resolve_time,
            last_updated_quote: quote_price.resolve_time,
        })
    }
}

fn authorize(access: &AccessControl, role: Role, caller: &Address, action: &str) -> FeedResult<()> {
    access
        .ensure_role(role, caller)
        .map_err(|e| log_rejection(caller, action, e))
}

fn log_rejection(caller: &Address, action: &str, error: FeedError) -> FeedError {
    warn!("{} rejected for {}: {}", action, caller, error);
    error
}

fn check_read_gates(state: &FeedState, caller: &Address, median: bool) -> FeedResult<()> {
    if !state.gates.allowed(&state.whitelist, caller) {
        warn!("Query from non-whitelisted {} refused", caller);
        return Err(forbidden!("{} is not whitelisted", caller));
    }
    if median && !state.gates.median_allowed() {
        warn!("Median query from {} refused", caller);
        return Err(forbidden!("median queries are disabled"));
    }
    Ok(())
}
