use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::sync::{Arc, MutexGuard};

use log::debug;
use rand::seq::SliceRandom;

use crate::cache::{Cache, SharedCache};
use crate::dns::message::{decode_response, encode_query, Response};
use crate::dns::question::Question;
use crate::dns::record::{RData, ResourceRecord};
use crate::dns::QType;
use crate::error::ResolveError;
use crate::trace::Tracer;
use crate::transport::{Transport, UdpTransport, DNS_PORT};

/// An iterative resolver. It asks the configured bootstrap server first and
/// follows delegations itself, never asking any server to recurse. All
/// learned records land in the shared cache; lookups are answered from it.
///
/// One resolver drives one socket, strictly sequentially. For concurrent
/// lookups, create several resolvers over a shared cache.
pub struct Resolver<T: Transport = UdpTransport> {
    cache: SharedCache,
    transport: T,
    tracer: Arc<dyn Tracer>,
    server: Ipv4Addr,
}

impl Resolver<UdpTransport> {
    /// Binds a fresh UDP socket and points the resolver at its bootstrap
    /// server: `None` or `"root"` for the first seeded root hint,
    /// `"random"` for an arbitrary one, anything else as a host name or
    /// IPv4 address.
    pub fn new(
        initial_server: Option<&str>,
        cache: SharedCache,
        tracer: Arc<dyn Tracer>,
    ) -> Result<Self, ResolveError> {
        let transport = UdpTransport::bind()?;
        Self::with_transport(transport, initial_server, cache, tracer)
    }
}

impl<T: Transport> Resolver<T> {
    /// Like [`Resolver::new`] but over a caller-supplied transport.
    pub fn with_transport(
        transport: T,
        initial_server: Option<&str>,
        cache: SharedCache,
        tracer: Arc<dyn Tracer>,
    ) -> Result<Self, ResolveError> {
        let server = {
            let guard = cache.lock().expect("cache mutex poisoned");
            bootstrap_address(&guard, initial_server)?
        };
        Ok(Self {
            cache,
            transport,
            tracer,
            server,
        })
    }

    /// Repoints the resolver at another bootstrap server.
    pub fn set_initial_server(&mut self, server: &str) -> Result<(), ResolveError> {
        let address = bootstrap_address(&self.lock_cache(), Some(server))?;
        self.server = address;
        Ok(())
    }

    /// Answers from the cache when possible, otherwise walks the hierarchy
    /// from the bootstrap server and reads the cache again. Empty means the
    /// lookup failed; the resolver does not say why.
    pub fn get_direct(&mut self, question: &Question) -> Vec<ResourceRecord> {
        let cached = self.lock_cache().get_valid(question);
        if !cached.is_empty() {
            return cached;
        }
        let server = self.server;
        self.iterative_query(question, server);
        self.lock_cache().get_valid(question)
    }

    /// A direct lookup that additionally follows CNAME indirection, up to
    /// `max_depth` links. Direct records come first, expansions after, in
    /// the order the aliases were found. A chain longer than the budget is
    /// reported as [`ResolveError::DepthExceeded`].
    pub fn get_recursive(
        &mut self,
        question: &Question,
        max_depth: i32,
    ) -> Result<Vec<ResourceRecord>, ResolveError> {
        if max_depth < 0 {
            return Err(ResolveError::DepthExceeded);
        }
        let direct = self.get_direct(question);
        if direct.is_empty() || question.qtype == QType::CNAME {
            return Ok(direct);
        }

        let mut all = direct.clone();
        for record in &direct {
            if record.question.qtype != QType::CNAME {
                continue;
            }
            if let RData::Name(target) = &record.payload {
                let next = Question::new(target.as_str(), question.qtype, question.qclass);
                all.extend(self.get_recursive(&next, max_depth - 1)?);
            }
        }
        Ok(all)
    }

    /// Releases the resolver and its socket.
    pub fn close(self) {}

    // One round of the iterative walk. Every response is cached in full,
    // then the cache decides: an answer ends the walk, a delegation with a
    // known address moves it to the next server, anything else gives up.
    fn iterative_query(&mut self, question: &Question, mut server: Ipv4Addr) {
        loop {
            let (payload, txid) = match encode_query(question) {
                Ok(encoded) => encoded,
                Err(error) => {
                    debug!("cannot encode query for {}: {}", question, error);
                    return;
                }
            };

            let datagram =
                match self
                    .transport
                    .exchange(server, question, &payload, txid, self.tracer.as_ref())
                {
                    Some(datagram) => datagram,
                    None => return,
                };

            let response = match decode_response(&datagram, self.tracer.as_ref()) {
                Ok(response) => response,
                Err(error) => {
                    debug!("dropping response from {}: {}", server, error);
                    return;
                }
            };

            {
                let mut cache = self.lock_cache();
                for record in response.records() {
                    cache.insert(record.clone());
                }
            }

            if !self.lock_cache().get_valid(question).is_empty() {
                return;
            }

            match self.next_server(&response) {
                Some(address) => {
                    debug!("delegating {} to {}", question, address);
                    server = address;
                }
                None => return,
            }
        }
    }

    // Picks the first nameserver from the authority section whose address
    // is already cached. A delegation made only of glueless nameservers
    // ends the walk empty-handed.
    fn next_server(&self, response: &Response) -> Option<Ipv4Addr> {
        let cache = self.lock_cache();
        for nameserver in response.nameservers() {
            if let RData::Name(target) = &nameserver.payload {
                let glue = Question::new(target.as_str(), QType::A, nameserver.question.qclass);
                for record in cache.get_valid(&glue) {
                    if let RData::A(address) = record.payload {
                        return Some(address);
                    }
                }
            }
        }
        None
    }

    fn lock_cache(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().expect("cache mutex poisoned")
    }
}

fn bootstrap_address(cache: &Cache, server: Option<&str>) -> Result<Ipv4Addr, ResolveError> {
    match server {
        None | Some("root") => root_hint_address(cache, false),
        Some("random") => root_hint_address(cache, true),
        Some(host) => resolve_host(host),
    }
}

fn root_hint_address(cache: &Cache, pick_random: bool) -> Result<Ipv4Addr, ResolveError> {
    let mut candidates = Vec::new();
    for hint in cache.get_raw(&Cache::root_question()) {
        if let RData::Name(target) = &hint.payload {
            let glue = Question::new(target.as_str(), QType::A, hint.question.qclass);
            for record in cache.get_raw(&glue) {
                if let RData::A(address) = record.payload {
                    candidates.push(address);
                }
            }
        }
    }

    let picked = if pick_random {
        candidates.choose(&mut rand::thread_rng()).copied()
    } else {
        candidates.first().copied()
    };
    picked.ok_or_else(|| ResolveError::UnknownHost("root".to_owned()))
}

fn resolve_host(host: &str) -> Result<Ipv4Addr, ResolveError> {
    if let Ok(address) = host.parse::<Ipv4Addr>() {
        return Ok(address);
    }
    let addresses = (host, DNS_PORT)
        .to_socket_addrs()
        .map_err(|_| ResolveError::UnknownHost(host.to_owned()))?;
    for address in addresses {
        if let SocketAddr::V4(v4) = address {
            return Ok(*v4.ip());
        }
    }
    Err(ResolveError::UnknownHost(host.to_owned()))
}
