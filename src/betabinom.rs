//! Beta-binomial log-pmf cache. Grounded on
//! `model/priors/single_cell_bulk.rs::SingleCellBulkModel::prob_rho`,
//! which evaluates `ln_binomial(n,k) + ln_beta(k+a, n-k+b) - ln_beta(a,b)`
//! fresh on every call; this cache factors the shared log-gamma ratios
//! out into three monotone-growing arrays so repeated evaluation at the
//! same `(p, rho)` over many `(k, n)` pairs costs O(1) amortized per
//! query instead of re-deriving `ln_beta` each time.
//!
//! For a beta-binomial with mean `p` and overdispersion `rho`, the
//! standard parameterisation is `alpha = p(1-rho)/rho`,
//! `beta = (1-p)(1-rho)/rho`. Writing
//! `alpha_log[n] = ln(Gamma(alpha+n)/Gamma(alpha)) - ln(n!)` (and
//! likewise for `beta`/`alpha+beta`), the beta-binomial log-pmf reduces
//! to `alpha_log[k] + beta_log[N-k] - alpha_beta_log[N]` with no further
//! `log C(N,k)` term needed — it's already absorbed into the three
//! `ln(n!)` denominators.

pub struct BetaBinomCache {
    p: f64,
    rho: f64,
    n1: usize,
    n2: usize,
    alpha_log: Vec<f64>,
    beta_log: Vec<f64>,
    alpha_beta_log: Vec<f64>,
}

impl BetaBinomCache {
    pub fn new() -> Self {
        BetaBinomCache {
            p: f64::NAN,
            rho: f64::NAN,
            n1: 0,
            n2: 0,
            alpha_log: vec![0.0],
            beta_log: vec![0.0],
            alpha_beta_log: vec![0.0],
        }
    }

    pub fn n1(&self) -> usize {
        self.n1
    }

    pub fn n2(&self) -> usize {
        self.n2
    }

    /// Grows the cache to cover `n1`/`n2`, resetting it first if `p`/`rho`
    /// changed since the last call. Cheap no-op if both the parameters
    /// are unchanged and the cache already covers the requested range.
    pub fn update(&mut self, p: f64, rho: f64, n1: usize, n2: usize) {
        if !(self.p == p && self.rho == rho) {
            self.p = p;
            self.rho = rho;
            self.n1 = 0;
            self.n2 = 0;
            self.alpha_log.truncate(1);
            self.beta_log.truncate(1);
            self.alpha_beta_log.truncate(1);
        }
        self.grow(n1.max(n2));
        self.n1 = self.n1.max(n1);
        self.n2 = self.n2.max(n2);
    }

    fn grow(&mut self, target: usize) {
        let degenerate = self.rho == 0.0;
        let (alpha, beta, alpha_beta) = if degenerate {
            (0.0, 0.0, 0.0)
        } else {
            let a = self.p * (1.0 - self.rho) / self.rho;
            let b = (1.0 - self.p) * (1.0 - self.rho) / self.rho;
            (a, b, a + b)
        };

        let have = self.alpha_log.len() - 1;
        for n in (have + 1)..=target {
            let nf = n as f64;
            let a_term = if degenerate { self.p.ln() } else { (alpha + nf - 1.0).ln() } - nf.ln();
            let b_term = if degenerate { (1.0 - self.p).ln() } else { (beta + nf - 1.0).ln() } - nf.ln();
            let ab_term = if degenerate { 0.0 } else { (alpha_beta + nf - 1.0).ln() } - nf.ln();
            self.alpha_log.push(self.alpha_log[n - 1] + a_term);
            self.beta_log.push(self.beta_log[n - 1] + b_term);
            self.alpha_beta_log.push(self.alpha_beta_log[n - 1] + ab_term);
        }
    }

    /// Beta-binomial log-pmf of `k` successes out of `n` trials, for the
    /// `(p, rho)` most recently passed to [`Self::update`]. Panics (debug
    /// builds only) if `n` exceeds the cache's current high-water mark.
    pub fn log_pmf(&self, k: usize, n: usize) -> f64 {
        debug_assert!(k <= n);
        debug_assert!(n <= self.n1.max(self.n2));
        self.alpha_log[k] + self.beta_log[n - k] - self.alpha_beta_log[n]
    }
}

impl Default for BetaBinomCache {
    fn default() -> Self {
        Self::new()
    }
}
