//! Mapping between the policy's flat embedding vectors and the structured
//! action a parameterized-action environment consumes.

/// An action in a parameterized action space: one discrete channel index plus
/// one continuous sub-vector per channel, zeroed except for the chosen channel
#[derive(Debug, Clone, PartialEq)]
pub struct HybridAction {
    pub discrete: usize,
    pub params: Vec<Vec<f32>>,
}

/// The ordered per-channel parameter widths of a parameterized action space
///
/// Immutable once derived from the environment; the encode and decode paths
/// share the same offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionLayout {
    widths: Vec<usize>,
    offsets: Vec<usize>,
}

impl ActionLayout {
    pub fn new(widths: Vec<usize>) -> Self {
        assert!(!widths.is_empty(), "action space must have at least one discrete channel");
        let offsets = widths
            .iter()
            .scan(0, |acc, w| {
                let offset = *acc;
                *acc += w;
                Some(offset)
            })
            .collect();
        Self { widths, offsets }
    }

    /// The number of discrete channels
    pub fn num_discrete(&self) -> usize {
        self.widths.len()
    }

    /// The summed width of all channels, i.e. the length of the flat parameter embedding
    pub fn param_dim(&self) -> usize {
        self.widths.iter().sum()
    }

    /// The parameter width of channel `i`
    pub fn width(&self, i: usize) -> usize {
        self.widths[i]
    }

    /// The start of channel `i`'s sub-range within the flat parameter embedding
    pub fn offset(&self, i: usize) -> usize {
        self.offsets[i]
    }

    /// Build the env-facing action structure for channel `discrete`: every
    /// channel holds a zero vector of its declared width except the chosen
    /// one, which holds `params`
    pub fn encode(&self, discrete: usize, params: &[f32]) -> HybridAction {
        assert_eq!(
            params.len(),
            self.widths[discrete],
            "parameter sub-vector does not match channel width"
        );
        let mut padded: Vec<Vec<f32>> = self.widths.iter().map(|&w| vec![0.0; w]).collect();
        padded[discrete].copy_from_slice(params);
        HybridAction {
            discrete,
            params: padded,
        }
    }

    /// Slice channel `discrete`'s parameter sub-vector out of the flat embedding
    pub fn decode<'a>(&self, parameter_emb: &'a [f32], discrete: usize) -> &'a [f32] {
        assert_eq!(
            parameter_emb.len(),
            self.param_dim(),
            "flat parameter vector does not match layout"
        );
        let offset = self.offsets[discrete];
        &parameter_emb[offset..offset + self.widths[discrete]]
    }

    /// Discretize and decode a pair of embeddings into the executable action
    ///
    /// This is the sole discretization rule, shared by action selection during
    /// training and during evaluation.
    pub fn greedy(&self, discrete_emb: &[f32], parameter_emb: &[f32]) -> HybridAction {
        let discrete = select_discrete(discrete_emb);
        self.encode(discrete, self.decode(parameter_emb, discrete))
    }
}

/// The arg-max index of a discrete embedding, ties broken by lowest index
pub fn select_discrete(discrete_emb: &[f32]) -> usize {
    assert!(!discrete_emb.is_empty(), "discrete embedding is non-empty");
    let mut best = 0;
    for (i, &x) in discrete_emb.iter().enumerate().skip(1) {
        if x > discrete_emb[best] {
            best = i;
        }
    }
    best
}
