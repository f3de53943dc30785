//! Five-sample pivot selection with a rotation path for descending
//! intervals.

use crate::Scalar;

/// The three middle sample positions left behind by [`select_pivot`].
///
/// `mid` holds the chosen pivot; `sl` and `sr` feed the pivot-duplicate
/// check in the quicksort loop.
pub(crate) struct Samples<T> {
    pub sl: *mut T,
    pub mid: *mut T,
    pub sr: *mut T,
}

/// Prepares `[low, high]` of width `x` for partitioning and leaves the
/// chosen pivot at the midpoint.
///
/// Seven positions are read: the endpoints, two near-sixth points, two
/// near-third points and the midpoint. Unless the seven values are strictly
/// descending, the five inner candidates are insertion sorted in place
/// (with an endpoint refinement that pulls `low`/`high` in when they widen
/// the spread), so the midpoint ends up holding their median.
///
/// Strictly descending samples mean the interval very likely descends too,
/// and Lomuto partitioning degrades badly on descending data. In that case
/// the candidates are not sorted; the whole interval is swap-rotated around
/// the midpoint instead. Odd widths leave one central element out of order,
/// which the branchless partition absorbs.
///
/// # Safety
///
/// `low <= high` must delimit a valid inclusive range with
/// `x == high - low`.
pub(crate) unsafe fn select_pivot<T: Scalar>(low: *mut T, high: *mut T, x: usize) -> Samples<T> {
    debug_assert!(low <= high);

    // An inexpensive approximation of a third (and a sixth) of the
    // interval.
    let y = x >> 2;
    let third = y + (y >> 1);
    let sixth = third >> 1;

    let mid = low.add(x >> 1);

    let sl = low.add(third);
    let sr = high.sub(third);

    let mut cl = low.add(sixth);
    let mut cr = high.sub(sixth);

    // The bitwise or keeps the seven comparisons unconditional.
    if (*low <= *cl)
        | (*cl <= *sl)
        | (*sl <= *mid)
        | (*mid <= *sr)
        | (*sr <= *cr)
        | (*cr <= *high)
    {
        if *low < *cl {
            cl = low;
        }
        if *high > *cr {
            cr = high;
        }

        if *sl < *cl {
            let e = *sl;
            *sl = *cl;
            *cl = e;
        }

        if *mid < *sl {
            let e = *mid;
            *mid = *sl;
            *sl = e;
            if e < *cl {
                *sl = *cl;
                *cl = e;
            }
        }

        if *sr < *mid {
            let e = *sr;
            *sr = *mid;
            *mid = e;
            if e < *sl {
                *mid = *sl;
                *sl = e;
                if e < *cl {
                    *sl = *cl;
                    *cl = e;
                }
            }
        }

        if *cr < *sr {
            let e = *cr;
            *cr = *sr;
            *sr = e;
            if e < *mid {
                *sr = *mid;
                *mid = e;
                if e < *sl {
                    *mid = *sl;
                    *sl = e;
                    if e < *cl {
                        *sl = *cl;
                        *cl = e;
                    }
                }
            }
        }
    } else {
        let mut u = low;
        let mut q = high;
        while u < mid {
            let e = *u;
            *u = *q;
            *q = e;
            u = u.add(1);
            q = q.sub(1);
        }
    }

    Samples { sl, mid, sr }
}
