//! ProjectilePool — reusable projectile instances, bucket per ProjectileTypeId
//!
//! # Architecture
//! - Один pool на session, resource (передаётся явно, без глобального singleton)
//! - Bucket = все instance'ы одного типа + inactive queue + active set
//! - Instance принадлежит своему bucket'у всю жизнь (slot в `instances`)
//! - Inactive queue — LIFO: только что возвращённый instance выдаётся первым
//! - Handle = (type, slot, flight, instance). `flight` растёт на каждом acquire →
//!   handle прошлого полёта становится stale (double release, stale get → no-op)
//!
//! # Policy
//! - Acquire никогда не fail'ится: пустой bucket → новый instance (capacity growth, Info log)
//! - Release untracked / stale handle → Warning log, no-op

use bevy::prelude::*;
use std::collections::{HashMap, HashSet, VecDeque};

use super::flight::{InstanceId, Projectile, ProjectileKind, ProjectileTypeId};
use crate::config::DEFAULT_POOL_PREWARM;
use crate::logger::{log, log_info, log_warning};

/// Handle на один полёт instance'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectileHandle {
    kind: ProjectileTypeId,
    slot: u32,
    flight: u32,
    instance: InstanceId,
}

impl ProjectileHandle {
    pub fn kind(&self) -> ProjectileTypeId {
        self.kind
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn flight(&self) -> u32 {
        self.flight
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }
}

/// Состояние bucket'а (debug / UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketStatus {
    pub kind: ProjectileTypeId,
    pub inactive: usize,
    pub active: usize,
    pub total: usize,
}

#[derive(Debug)]
struct Bucket {
    kind: ProjectileKind,
    instances: Vec<Projectile>,
    inactive: VecDeque<u32>,
    active: HashSet<u32>,
}

impl Bucket {
    fn new(kind: ProjectileKind) -> Self {
        Self {
            kind,
            instances: Vec::new(),
            inactive: VecDeque::new(),
            active: HashSet::new(),
        }
    }

    fn spawn_instance(&mut self, instance: InstanceId) -> u32 {
        let slot = self.instances.len() as u32;
        self.instances.push(Projectile::new(instance, self.kind));
        slot
    }

    fn is_tracked(&self, handle: &ProjectileHandle) -> bool {
        self.active.contains(&handle.slot)
            && self
                .instances
                .get(handle.slot as usize)
                .is_some_and(|projectile| {
                    projectile.flight == handle.flight && projectile.instance() == handle.instance
                })
    }
}

#[derive(Resource, Debug)]
pub struct ProjectilePool {
    buckets: HashMap<ProjectileTypeId, Bucket>,
    kinds: HashMap<ProjectileTypeId, ProjectileKind>,
    prewarm: usize,
    next_instance: u64,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_PREWARM)
    }
}

impl ProjectilePool {
    /// `prewarm` — размер bucket'а, создаваемого lazily при первом acquire
    pub fn new(prewarm: usize) -> Self {
        Self {
            buckets: HashMap::new(),
            kinds: HashMap::new(),
            prewarm,
            next_instance: 0,
        }
    }

    /// Зарегистрировать параметры типа снаряда.
    ///
    /// Только до создания bucket'а: membership и параметры instance'ов
    /// фиксируются при первом создании. Возвращает false, если bucket уже есть.
    pub fn register_kind(&mut self, kind: ProjectileKind) -> bool {
        if self.buckets.contains_key(&kind.id) {
            log_warning(&format!(
                "ProjectilePool: bucket {:?} already exists, kind not updated",
                kind.id
            ));
            return false;
        }

        self.kinds.insert(kind.id, kind.sanitized());
        true
    }

    /// Параметры типа (зарегистрированные или default)
    pub fn kind(&self, id: ProjectileTypeId) -> ProjectileKind {
        self.kinds
            .get(&id)
            .copied()
            .unwrap_or_else(|| ProjectileKind::new(id))
    }

    /// Pre-populate bucket `initial_size` inactive instance'ами.
    /// Для существующего bucket'а — добавляет instance'ы (pre-warm growth).
    pub fn create_bucket(&mut self, id: ProjectileTypeId, initial_size: usize) {
        let kind = self.kind(id);
        let mut next_instance = self.next_instance;

        let bucket = self.buckets.entry(id).or_insert_with(|| Bucket::new(kind));
        for _ in 0..initial_size {
            let slot = bucket.spawn_instance(InstanceId(next_instance));
            next_instance += 1;
            bucket.inactive.push_back(slot);
        }

        self.next_instance = next_instance;

        log_info(&format!(
            "ProjectilePool: bucket {:?} pre-warmed (+{}, total {})",
            id,
            initial_size,
            bucket.instances.len()
        ));
    }

    /// Взять instance из bucket'а. Никогда не fail'ится.
    ///
    /// Caller (simulation) получает exclusive право мутировать instance
    /// через `get_mut(handle)` до `release`.
    pub fn acquire(&mut self, id: ProjectileTypeId) -> ProjectileHandle {
        if !self.buckets.contains_key(&id) {
            self.create_bucket(id, self.prewarm);
        }

        let kind = self.kind(id);
        let next_instance = self.next_instance;
        let bucket = self.buckets.entry(id).or_insert_with(|| Bucket::new(kind));

        let slot = match bucket.inactive.pop_back() {
            Some(slot) => slot,
            None => {
                let slot = bucket.spawn_instance(InstanceId(next_instance));
                self.next_instance += 1;
                log_info(&format!(
                    "ProjectilePool: bucket {:?} exhausted, growing to {}",
                    id,
                    bucket.instances.len()
                ));
                slot
            }
        };

        let projectile = &mut bucket.instances[slot as usize];
        projectile.on_acquired();
        bucket.active.insert(slot);

        ProjectileHandle {
            kind: id,
            slot,
            flight: projectile.flight,
            instance: projectile.instance(),
        }
    }

    /// Вернуть instance в pool. Untracked / stale handle → warning + false.
    pub fn release(&mut self, handle: ProjectileHandle) -> bool {
        let Some(bucket) = self.buckets.get_mut(&handle.kind) else {
            log_warning(&format!(
                "⚠️ ProjectilePool: release of handle from unknown bucket {:?}",
                handle
            ));
            return false;
        };

        if !bucket.is_tracked(&handle) {
            log_warning(&format!(
                "⚠️ ProjectilePool: release of untracked projectile {:?} (already released?)",
                handle
            ));
            return false;
        }

        bucket.active.remove(&handle.slot);
        bucket.instances[handle.slot as usize].reset_to_pool();
        bucket.inactive.push_back(handle.slot);

        log(&format!("♻️ Projectile {:?} returned to pool", handle));
        true
    }

    pub fn get(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        let bucket = self.buckets.get(&handle.kind)?;
        if !bucket.is_tracked(&handle) {
            return None;
        }
        bucket.instances.get(handle.slot as usize)
    }

    pub fn get_mut(&mut self, handle: ProjectileHandle) -> Option<&mut Projectile> {
        let bucket = self.buckets.get_mut(&handle.kind)?;
        if !bucket.is_tracked(&handle) {
            return None;
        }
        bucket.instances.get_mut(handle.slot as usize)
    }

    pub fn is_active(&self, handle: ProjectileHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Handles всех active instance'ов (детерминированный порядок: type, slot)
    pub fn active_handles(&self) -> Vec<ProjectileHandle> {
        let mut handles: Vec<_> = self
            .buckets
            .iter()
            .flat_map(|(kind, bucket)| {
                bucket.active.iter().map(|&slot| {
                    let projectile = &bucket.instances[slot as usize];
                    ProjectileHandle {
                        kind: *kind,
                        slot,
                        flight: projectile.flight,
                        instance: projectile.instance(),
                    }
                })
            })
            .collect();

        handles.sort_by_key(|handle| (handle.kind, handle.slot));
        handles
    }

    pub fn active_count(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.active.len()).sum()
    }

    pub fn inactive_count(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.inactive.len()).sum()
    }

    pub fn total_instances(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.instances.len()).sum()
    }

    pub fn status(&self) -> Vec<BucketStatus> {
        let mut status: Vec<_> = self
            .buckets
            .iter()
            .map(|(kind, bucket)| BucketStatus {
                kind: *kind,
                inactive: bucket.inactive.len(),
                active: bucket.active.len(),
                total: bucket.instances.len(),
            })
            .collect();

        status.sort_by_key(|entry| entry.kind);
        status
    }

    pub fn log_status(&self) {
        log_info("=== ProjectilePool Status ===");
        for entry in self.status() {
            log_info(&format!(
                "{:?}: in pool {}, active {}, total {}",
                entry.kind, entry.inactive, entry.active, entry.total
            ));
        }
        log_info(&format!("Active projectiles: {}", self.active_count()));
    }

    /// Partition invariant: каждый slot bucket'а ровно в одном из
    /// {inactive queue, active set}, без дубликатов.
    pub fn is_consistent(&self) -> bool {
        self.buckets.values().all(|bucket| {
            let mut seen = HashSet::new();
            let inactive_unique = bucket.inactive.iter().all(|slot| seen.insert(*slot));
            let disjoint = bucket.active.iter().all(|slot| seen.insert(*slot));
            let flags_match = bucket.instances.iter().enumerate().all(|(slot, projectile)| {
                bucket.active.contains(&(slot as u32)) || !projectile.is_alive()
            });

            inactive_unique && disjoint && seen.len() == bucket.instances.len() && flags_match
        })
    }

    /// Explicit teardown: уничтожает все instance'ы (active handles становятся stale)
    pub fn clear(&mut self) {
        let total = self.total_instances();
        self.buckets.clear();
        log_info(&format!("ProjectilePool: all buckets cleared ({} instances)", total));
    }
}
